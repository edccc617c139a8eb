//! # stencil_relief
//!
//! Relief - The sculptured data surface for Stencil.
//!
//! ## Name Origin
//!
//! A **relief** is a sculpture that stands out from a flat background. This crate
//! holds the shapes that stand out from flat document text: the placeholder
//! matches found by the scanner, the variable catalog built by the classifier,
//! the rename table produced by the normalizer, and the document model those
//! passes read from and write back to.
//!
//! ## Modules
//!
//! - [`ast`] - Raw placeholder matches and scan results
//! - [`catalog`] - Variable catalog and rename table
//! - [`diagnostic`] - Non-fatal findings reported alongside results
//! - [`document`] - Document model and the text source/sink seams
//! - [`errors`] - Error types for the source and sink seams

pub mod ast;
pub mod catalog;
pub mod diagnostic;
pub mod document;
pub mod errors;

pub use ast::*;
pub use catalog::*;
pub use diagnostic::*;
pub use document::*;
pub use errors::*;
