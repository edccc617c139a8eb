//! Whole-document normalization.

use crate::error::NormalizeError;
use crate::normalizer::normalize_fragment;
use crate::options::NormalizeOptions;
use serde::Serialize;
use stencil_relief::{
    Diagnostic, DiagnosticCode, DocumentTextSink, DocumentTextSource, RenameTable,
};

/// Outcome of normalizing a whole document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentReport {
    /// Number of fragments rewritten
    pub changes: usize,

    /// Document-wide rename table; a later fragment wins for the same name
    pub renames: RenameTable,

    /// Fragments that could not be written back
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,

    /// Whether the caller should write the document back
    pub persist: bool,
}

impl DocumentReport {
    #[inline]
    pub fn changed(&self) -> bool {
        self.changes > 0
    }
}

/// Normalize every fragment of a document in place.
///
/// Fragments are visited in document order. A fragment is either fully
/// rewritten or left alone; a rejected write is reported as a diagnostic and
/// the pass moves on.
pub fn normalize_document<D>(
    document: &mut D,
    options: &NormalizeOptions,
) -> Result<DocumentReport, NormalizeError>
where
    D: DocumentTextSource + DocumentTextSink + ?Sized,
{
    let fragments = document.fragments()?;
    let mut report = DocumentReport::default();

    for fragment in fragments {
        let result = normalize_fragment(&fragment.text);
        if !result.changed {
            continue;
        }

        match document.replace_text(fragment.id, &result.text) {
            Ok(()) => {
                tracing::debug!(fragment = %fragment.id, renames = result.renames.len(), "rewrote fragment");
                report.changes += 1;
                report.renames.merge(result.renames);
            }
            Err(error) => {
                tracing::warn!(fragment = %fragment.id, %error, "fragment write failed");
                report
                    .diagnostics
                    .push(Diagnostic::new(DiagnosticCode::FragmentWriteFailed, error.to_string()));
            }
        }
    }

    report.persist = options.persist.should_persist(report.changes);
    Ok(report)
}

/// Render the payload template of a rename table as pretty JSON.
///
/// Keys are the normalized names, values show the original spelling.
pub fn render_payload_template(renames: &RenameTable) -> Result<String, NormalizeError> {
    Ok(serde_json::to_string_pretty(&renames.payload_template())?)
}
