//! Analysis result.

use serde::Serialize;
use stencil_relief::{Catalog, Diagnostic};

/// Everything learned about one template
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Croquis {
    pub catalog: Catalog,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Croquis {
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty() && self.diagnostics.is_empty()
    }
}
