//! Check command - Report what is left to migrate in each template

use crate::config::StencilConfig;
use crate::loader::load_document;
use clap::Args;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use stencil_armature::{lint, Scanner};
use stencil_glyph::find_legacy_placeholders;
use stencil_relief::{Diagnostic, DiagnosticCode, DocumentTextSource};

#[derive(Args)]
pub struct CheckArgs {
    /// Files, directories or glob patterns of templates (.json documents, .txt files)
    #[arg(default_value = ".")]
    pub patterns: Vec<String>,

    /// Quiet mode - only show summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Findings for one file
#[derive(Debug, Default)]
struct CheckResult {
    /// Double-brace placeholders, loop openers and conditional openers found
    placeholders: usize,
    diagnostics: Vec<Diagnostic>,
}

pub fn run(args: CheckArgs, config: &StencilConfig) {
    let scanner = match Scanner::new(&config.scan.scanner_options()) {
        Ok(scanner) => scanner,
        Err(e) => {
            eprintln!("Invalid scan configuration: {}", e);
            std::process::exit(1);
        }
    };

    let files = super::collect_documents(&args.patterns);
    if files.is_empty() {
        eprintln!("No template files found matching patterns: {:?}", args.patterns);
        return;
    }

    let has_findings = AtomicBool::new(false);
    let placeholder_count = AtomicUsize::new(0);
    let finding_count = AtomicUsize::new(0);
    let files_errored = AtomicUsize::new(0);

    let mut outputs: Vec<(String, Vec<String>)> = files
        .par_iter()
        .map(|path| {
            let file = path.display().to_string();
            match check_file(path, &scanner, config.max_file_size) {
                Ok(result) => {
                    placeholder_count.fetch_add(result.placeholders, Ordering::Relaxed);
                    finding_count.fetch_add(result.diagnostics.len(), Ordering::Relaxed);
                    if !result.diagnostics.is_empty() {
                        has_findings.store(true, Ordering::Relaxed);
                    }
                    let lines = result
                        .diagnostics
                        .iter()
                        .map(|d| format!("{}: {}", file, d))
                        .collect();
                    (file, lines)
                }
                Err(err) => {
                    files_errored.fetch_add(1, Ordering::Relaxed);
                    has_findings.store(true, Ordering::Relaxed);
                    (file.clone(), vec![format!("{}: {}", file, err)])
                }
            }
        })
        .collect();
    outputs.sort_by(|a, b| a.0.cmp(&b.0));

    if !args.quiet {
        for (_, lines) in &outputs {
            for line in lines {
                println!("{}", line);
            }
        }
    }

    let findings = finding_count.load(Ordering::Relaxed);
    let errored = files_errored.load(Ordering::Relaxed);
    eprintln!();
    eprintln!(
        "Checked {} file(s): {} placeholder(s), {} finding(s)",
        files.len(),
        placeholder_count.load(Ordering::Relaxed),
        findings
    );
    if errored > 0 {
        eprintln!("  {} file(s) had errors", errored);
    }

    if has_findings.load(Ordering::Relaxed) {
        std::process::exit(1);
    }
}

fn check_file(path: &Path, scanner: &Scanner, max_file_size: u64) -> Result<CheckResult, String> {
    let document = load_document(path, max_file_size).map_err(|e| e.to_string())?;
    let fragments = document.fragments().map_err(|e| e.to_string())?;
    let text = scanner.flatten(&fragments);
    let scan = scanner.scan(&text);

    // legacy spans never cross fragments; shift them into the flattened text
    let mut diagnostics: Vec<Diagnostic> = fragments
        .iter()
        .zip(scanner.fragment_offsets(&fragments))
        .flat_map(|(fragment, start)| {
            find_legacy_placeholders(&fragment.text)
                .into_iter()
                .map(move |legacy| (start, legacy))
        })
        .map(|(start, legacy)| {
            Diagnostic::new(
                DiagnosticCode::LegacyPlaceholder,
                format!(
                    "`{{{}}}` uses the single-brace syntax; `stencil normalize` rewrites it as `{{{{{}}}}}`",
                    legacy.original, legacy.normalized
                ),
            )
            .with_offset(start + legacy.offset)
        })
        .collect();
    diagnostics.extend(lint(&text));
    diagnostics.sort_by_key(|d| d.offset);

    Ok(CheckResult {
        placeholders: scan.len(),
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.txt");
        fs::write(&path, "Hello {{ name }}\n{% if vip %}VIP{% endif %}").unwrap();

        let result = check_file(&path, &Scanner::default(), 1024).unwrap();
        assert_eq!(result.placeholders, 2);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_findings_in_offset_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        fs::write(&path, "Dear {Full Name}, {{ Passport No }} {{ ok }}").unwrap();

        let result = check_file(&path, &Scanner::default(), 1024).unwrap();
        assert_eq!(result.placeholders, 1);
        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::LegacyPlaceholder, DiagnosticCode::InvalidName]
        );
        assert_eq!(result.diagnostics[0].offset, Some(5));
        assert_eq!(
            result.diagnostics[0].message,
            "`{Full Name}` uses the single-brace syntax; `stencil normalize` rewrites it as `{{Full_Name}}`"
        );
        assert_eq!(result.diagnostics[1].offset, Some(18));
    }

    #[test]
    fn test_braces_across_lines_are_not_legacy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split.txt");
        fs::write(&path, "Dear {Full\nName}, hello").unwrap();

        let result = check_file(&path, &Scanner::default(), 1024).unwrap();
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_legacy_offsets_follow_flattened_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("second_line.txt");
        fs::write(&path, "Привет\nDear {Full Name}").unwrap();

        let result = check_file(&path, &Scanner::default(), 1024).unwrap();
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::LegacyPlaceholder);
        // six characters, one separator, then "Dear "
        assert_eq!(result.diagnostics[0].offset, Some(12));
    }
}
