//! Error types for stencil_armature.

use thiserror::Error;

/// Errors that can occur while building a scanner
#[derive(Debug, Error)]
pub enum ScanError {
    /// A configured pattern is not a valid regular expression
    #[error("Invalid {which} pattern: {source}")]
    InvalidPattern {
        which: &'static str,
        #[source]
        source: regex::Error,
    },

    /// A configured pattern does not capture what the scanner reads
    #[error("The {which} pattern needs {expected} capture group(s), found {found}")]
    CaptureGroups {
        which: &'static str,
        expected: usize,
        found: usize,
    },
}
