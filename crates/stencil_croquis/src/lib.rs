//! # stencil_croquis
//!
//! Croquis - The variable classifier for Stencil.
//!
//! ## Name Origin
//!
//! **Croquis** (/kʁɔ.ki/) is a French term for a quick, sketchy drawing that
//! captures the essential features of a subject. `stencil_croquis` sketches the
//! data a template expects: which root variables it reads, and whether each is
//! a plain value, a flag, a list of records or a nested object.
//!
//! ## Architecture
//!
//! ```text
//! stencil_armature (Scan)
//!          ↓
//!   stencil_relief (Matches)
//!          ↓
//!  stencil_croquis (Classify)  ← This crate
//!          ↓
//!   Catalog / payload skeleton / payload validation
//! ```

mod analysis;
mod analyzer;
pub mod builtins;
mod document;
pub mod payload;

pub use analysis::Croquis;
pub use analyzer::{Analyzer, AnalyzerOptions};
pub use document::{analyze_batch, analyze_source, analyze_text, BatchItem};
pub use payload::{skeleton, validate, IssueKind, PayloadIssue};

use stencil_relief::{Catalog, ScanResult};

/// Classify a scan with default options.
#[inline]
pub fn classify(scan: &ScanResult) -> Catalog {
    let mut analyzer = Analyzer::new();
    analyzer.analyze(scan);
    analyzer.finish().catalog
}
