//! # stencil_armature
//!
//! Armature - The structural placeholder scanner for Stencil.
//!
//! ## Name Origin
//!
//! An **armature** is the wire skeleton a sculptor builds before adding clay.
//! `stencil_armature` finds the skeleton of a template: every substitution,
//! loop opener and conditional opener in a document's flattened text, with the
//! offset where it starts.
//!
//! ## Example
//!
//! ```
//! use stencil_armature::scan;
//!
//! let result = scan("Hello {{ name }}! {% for row in rows %}{{ row.total }}{% endfor %}");
//! assert_eq!(result.simple.len(), 2);
//! assert_eq!(result.loops[0].captured_name, "rows");
//! ```

mod error;
mod lint;
mod patterns;
mod scanner;

pub use error::*;
pub use lint::lint;
pub use patterns::*;
pub use scanner::*;

use stencil_relief::ScanResult;

/// Scan text with the default pattern set.
#[inline]
pub fn scan(text: &str) -> ScanResult {
    Scanner::default().scan(text)
}
