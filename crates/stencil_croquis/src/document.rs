//! Text, document and batch analysis.
//!
//! These tie the scanner and the classifier together. A single document that
//! cannot be read is an error; in a batch the same failure only degrades that
//! one item.

use crate::analysis::Croquis;
use crate::analyzer::{Analyzer, AnalyzerOptions};
use stencil_armature::{lint, Scanner};
use stencil_relief::{Diagnostic, DiagnosticCode, DocumentTextSource, ScanResult, SourceError};

/// Result for one named item of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub name: String,
    pub croquis: Croquis,
}

/// Scan and classify already-flattened text.
pub fn analyze_text(scanner: &Scanner, options: &AnalyzerOptions, text: &str) -> Croquis {
    classify_scan(options, &scanner.scan(text), text)
}

fn classify_scan(options: &AnalyzerOptions, scan: &ScanResult, text: &str) -> Croquis {
    let mut analyzer = Analyzer::with_options(options.clone());
    analyzer.analyze(scan);
    if options.lint {
        analyzer.add_diagnostics(lint(text));
    }
    analyzer.finish()
}

/// Flatten, scan and classify a whole document.
pub fn analyze_source<S>(
    scanner: &Scanner,
    options: &AnalyzerOptions,
    source: &S,
) -> Result<Croquis, SourceError>
where
    S: DocumentTextSource + ?Sized,
{
    let scan = scanner.scan_source(source)?;
    Ok(classify_scan(options, &scan.result, &scan.text))
}

/// Analyze several documents, continuing past the ones that fail.
///
/// A failing document yields an empty catalog and a `source-unavailable`
/// diagnostic.
pub fn analyze_batch<'a, S, I>(
    scanner: &Scanner,
    options: &AnalyzerOptions,
    sources: I,
) -> Vec<BatchItem>
where
    S: DocumentTextSource + ?Sized + 'a,
    I: IntoIterator<Item = (&'a str, &'a S)>,
{
    sources
        .into_iter()
        .map(|(name, source)| {
            let croquis = match analyze_source(scanner, options, source) {
                Ok(croquis) => croquis,
                Err(error) => {
                    tracing::warn!(document = name, %error, "document unavailable");
                    Croquis {
                        diagnostics: vec![Diagnostic::new(
                            DiagnosticCode::SourceUnavailable,
                            format!("{name}: {error}"),
                        )],
                        ..Default::default()
                    }
                }
            };
            BatchItem {
                name: name.to_string(),
                croquis,
            }
        })
        .collect()
}
