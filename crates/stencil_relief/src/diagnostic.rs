//! Diagnostics reported next to scan, classification and normalization results.
//!
//! None of these abort a pass. Hard failures use the error types in
//! [`crate::errors`] instead.

use serde::Serialize;
use std::fmt;

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    Error = 0,
    Warning = 1,
}

impl Severity {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// What a diagnostic is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    /// A delimiter that the placeholder patterns cannot close
    MalformedInput,
    /// A `{{ ... }}` body that is not a valid placeholder name
    InvalidName,
    /// A single-delimiter `{name}` placeholder left in the text
    LegacyPlaceholder,
    /// The document text could not be obtained
    SourceUnavailable,
    /// Rewritten text could not be stored back into a fragment
    FragmentWriteFailed,
}

impl DiagnosticCode {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed-input",
            Self::InvalidName => "invalid-name",
            Self::LegacyPlaceholder => "legacy-placeholder",
            Self::SourceUnavailable => "source-unavailable",
            Self::FragmentWriteFailed => "fragment-write-failed",
        }
    }

    #[inline]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::SourceUnavailable | Self::FragmentWriteFailed => Severity::Error,
            Self::MalformedInput | Self::InvalidName | Self::LegacyPlaceholder => {
                Severity::Warning
            }
        }
    }
}

/// A diagnostic message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Character offset in the flattened text, when the finding has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            offset: None,
        }
    }

    #[inline]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.severity.as_str(), self.code.as_str())?;
        if let Some(offset) = self.offset {
            write!(f, " at {offset}")?;
        }
        write!(f, ": {}", self.message)
    }
}
