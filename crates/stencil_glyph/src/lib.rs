//! # stencil_glyph
//!
//! Glyph - The letterforms of Stencil templates.
//! Rewrites legacy single-brace placeholders into the double-brace syntax.
//!
//! ## Name Origin
//!
//! **Glyph** (/ɡlɪf/) refers to the visual representation of a character -
//! the form that gives meaning to written symbols. `stencil_glyph` redraws the
//! placeholders of older templates (`{Full Name}`) in the form the scanner
//! reads (`{{Full_Name}}`), without touching the surrounding text or its
//! formatting.
//!
//! ## Example
//!
//! ```
//! use stencil_glyph::{normalize_document, NormalizeOptions};
//! use stencil_relief::Document;
//!
//! let mut document = Document::from_paragraphs(["Dear {Full Name},"]);
//! let report = normalize_document(&mut document, &NormalizeOptions::default()).unwrap();
//!
//! assert_eq!(report.changes, 1);
//! assert_eq!(document.paragraphs[0].text(), "Dear {{Full_Name}},");
//! assert_eq!(report.renames.get("Full Name"), Some("Full_Name"));
//! ```

mod document;
mod error;
mod normalizer;
mod options;

pub use document::*;
pub use error::*;
pub use normalizer::*;
pub use options::*;
