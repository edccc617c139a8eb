//! Error types for the document text seams.

use crate::document::FragmentId;
use thiserror::Error;

/// The document text could not be produced
#[derive(Debug, Error)]
pub enum SourceError {
    /// IO error while reading the document
    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The document bytes are not a valid document
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// The collaborator behind the source refused or failed
    #[error("Document source unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(err.to_string())
    }
}

/// Rewritten text could not be stored into a fragment
#[derive(Debug, Error)]
pub enum SinkError {
    /// No fragment with this id exists in the document
    #[error("Fragment not found: {0}")]
    FragmentNotFound(FragmentId),

    /// The collaborator behind the sink refused the write
    #[error("Failed to write {id}: {reason}")]
    Rejected { id: FragmentId, reason: String },
}
