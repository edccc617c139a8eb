//! Error types for stencil_glyph normalizer.

use stencil_relief::SourceError;
use thiserror::Error;

/// Errors that can occur during normalization
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The document text could not be read
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The payload template could not be serialized
    #[error("Failed to serialize payload template: {0}")]
    Serialize(#[from] serde_json::Error),
}
