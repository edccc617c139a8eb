//! # Stencil
//!
//! Placeholder discovery and legacy syntax migration for document templates.
//!
//! This crate re-exports all Stencil sub-crates for unified documentation.
//!
//! ## Crates
//!
//! - [`carton`] - Shared lexical vocabulary and collection types
//! - [`relief`] - Matches, catalogs, diagnostics and the document model
//! - [`armature`] - Placeholder scanner and delimiter lint
//! - [`croquis`] - Variable classifier and payload helpers
//! - [`glyph`] - Legacy single-brace placeholder normalizer

/// Shared lexical vocabulary and collection types.
pub use stencil_carton as carton;

/// Matches, catalogs, diagnostics and the document model.
pub use stencil_relief as relief;

/// Placeholder scanner and delimiter lint.
pub use stencil_armature as armature;

/// Variable classifier and payload helpers.
pub use stencil_croquis as croquis;

/// Legacy single-brace placeholder normalizer.
pub use stencil_glyph as glyph;
