//! Normalize options for stencil_glyph.

use serde::{Deserialize, Serialize};

/// Normalization options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOptions {
    /// When the document should be written back (default: OnChange)
    #[serde(default)]
    pub persist: PersistPolicy,
}

/// When a normalized document should be persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistPolicy {
    /// Only when at least one fragment was rewritten
    #[default]
    OnChange,
    /// Always, even if nothing changed
    Always,
}

impl PersistPolicy {
    #[inline]
    pub fn should_persist(self, changes: usize) -> bool {
        match self {
            Self::OnChange => changes > 0,
            Self::Always => true,
        }
    }
}
