//! Carton - The artist's toolbox for Stencil.
//!
//! This crate provides the foundational utilities shared by every Stencil crate,
//! much like a carton (artist's portfolio case) holds all the essential tools and
//! materials an artist needs for their work.
//!
//! # Modules
//!
//! - **Lexical vocabulary**: placeholder delimiters and the name character classes
//!   shared by the scanner (`stencil_armature`) and the normalizer (`stencil_glyph`)
//!
//! # Example
//!
//! ```
//! use stencil_carton::lexical::{is_name, split_root};
//!
//! assert!(is_name("дата_договора"));
//! assert_eq!(split_root("company.address.city"), ("company", "address.city"));
//! ```

pub mod lexical;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

pub use lexical::*;
