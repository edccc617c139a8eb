//! Normalize command - Rewrite legacy single-brace placeholders using stencil_glyph

use super::PAYLOAD_SUFFIX;
use crate::config::StencilConfig;
use crate::loader::load_document;
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use stencil_glyph::{normalize_document, render_payload_template, NormalizeOptions, PersistPolicy};
use stencil_relief::RenameTable;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Files, directories or glob patterns of templates (.json documents, .txt files)
    #[arg(default_value = ".")]
    pub patterns: Vec<String>,

    /// Check without writing (exit with error if files need normalizing)
    #[arg(long)]
    pub check: bool,

    /// Write normalized output to files
    #[arg(short, long)]
    pub write: bool,

    /// Write files even when nothing changed
    #[arg(long)]
    pub always: bool,

    /// Directory for payload templates (`<name>.payload.json`)
    #[arg(long)]
    pub payload_dir: Option<PathBuf>,
}

/// Rename table of one file, as printed
#[derive(Serialize)]
struct RenameReport {
    file: String,
    renames: RenameTable,
}

/// What happened to one file
struct FileOutcome {
    changed: bool,
    renames: RenameTable,
}

pub fn run(args: NormalizeArgs, config: &StencilConfig) {
    let mut options = config.normalize.clone();
    if args.always {
        options.persist = PersistPolicy::Always;
    }

    let files = super::collect_documents(&args.patterns);
    if files.is_empty() {
        eprintln!("No template files found matching patterns: {:?}", args.patterns);
        return;
    }

    eprintln!("Found {} template file(s)", files.len());

    if let Some(dir) = &args.payload_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Failed to create {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    let has_errors = AtomicBool::new(false);
    let files_changed = AtomicUsize::new(0);
    let files_unchanged = AtomicUsize::new(0);
    let files_errored = AtomicUsize::new(0);

    let mut reports: Vec<RenameReport> = files
        .par_iter()
        .filter_map(|path| {
            match process_file(path, &options, &args, config.max_file_size) {
                Ok(outcome) => {
                    if outcome.changed {
                        files_changed.fetch_add(1, Ordering::Relaxed);
                        if args.check {
                            has_errors.store(true, Ordering::Relaxed);
                        }
                    } else {
                        files_unchanged.fetch_add(1, Ordering::Relaxed);
                    }
                    (!outcome.renames.is_empty()).then(|| RenameReport {
                        file: path.display().to_string(),
                        renames: outcome.renames,
                    })
                }
                Err(err) => {
                    eprintln!("Error normalizing {}: {}", path.display(), err);
                    files_errored.fetch_add(1, Ordering::Relaxed);
                    has_errors.store(true, Ordering::Relaxed);
                    None
                }
            }
        })
        .collect();
    reports.sort_by(|a, b| a.file.cmp(&b.file));

    if !reports.is_empty() {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize rename tables: {}", e),
        }
    }

    // Print summary
    let changed = files_changed.load(Ordering::Relaxed);
    let unchanged = files_unchanged.load(Ordering::Relaxed);
    let errored = files_errored.load(Ordering::Relaxed);

    eprintln!();
    if args.check {
        eprintln!("Checked {} file(s)", files.len());
        if changed > 0 {
            eprintln!("  {} file(s) would be normalized", changed);
        }
        if unchanged > 0 {
            eprintln!("  {} file(s) already normalized", unchanged);
        }
    } else if args.write {
        eprintln!("Normalized {} file(s)", files.len());
        if changed > 0 {
            eprintln!("  {} file(s) rewritten", changed);
        }
        if unchanged > 0 {
            eprintln!("  {} file(s) unchanged", unchanged);
        }
    } else {
        eprintln!(
            "Checked {} file(s) (use --write to apply changes)",
            files.len()
        );
        if changed > 0 {
            eprintln!("  {} file(s) would be normalized", changed);
        }
    }

    if errored > 0 {
        eprintln!("  {} file(s) had errors", errored);
    }

    if has_errors.load(Ordering::Relaxed) {
        std::process::exit(1);
    }
}

fn process_file(
    path: &Path,
    options: &NormalizeOptions,
    args: &NormalizeArgs,
    max_file_size: u64,
) -> Result<FileOutcome, String> {
    let mut document = load_document(path, max_file_size).map_err(|e| e.to_string())?;
    let report = normalize_document(&mut document, options).map_err(|e| e.to_string())?;

    for diagnostic in &report.diagnostics {
        eprintln!("{}: {}", path.display(), diagnostic);
    }

    if report.changed() {
        if args.check || !args.write {
            eprintln!("Would normalize: {}", path.display());
        } else {
            eprintln!("Normalized: {}", path.display());
        }
    }

    if args.write && !args.check && report.persist {
        document
            .save(path)
            .map_err(|e| format!("Failed to write file: {}", e))?;
    }

    if let Some(dir) = &args.payload_dir {
        if !report.renames.is_empty() {
            write_payload_template(dir, path, &report.renames)?;
        }
    }

    if !report.diagnostics.is_empty() {
        return Err(format!(
            "{} fragment(s) could not be rewritten",
            report.diagnostics.len()
        ));
    }

    Ok(FileOutcome {
        changed: report.changed(),
        renames: report.renames,
    })
}

fn payload_path(dir: &Path, template: &Path) -> PathBuf {
    let stem = template
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "template".to_string());
    dir.join(format!("{stem}{PAYLOAD_SUFFIX}"))
}

fn write_payload_template(dir: &Path, template: &Path, renames: &RenameTable) -> Result<(), String> {
    let json = render_payload_template(renames).map_err(|e| e.to_string())?;
    let target = payload_path(dir, template);
    fs::write(&target, json + "\n")
        .map_err(|e| format!("Failed to write {}: {}", target.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(write: bool, payload_dir: Option<PathBuf>) -> NormalizeArgs {
        NormalizeArgs {
            patterns: Vec::new(),
            check: false,
            write,
            always: false,
            payload_dir,
        }
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.txt");
        fs::write(&path, "Contract with {Name} dated {дата договора}").unwrap();

        let outcome = process_file(&path, &NormalizeOptions::default(), &args(false, None), 1024).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.renames.get("дата договора"), Some("дата_договора"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Contract with {Name} dated {дата договора}"
        );
    }

    #[test]
    fn test_write_and_payload_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.txt");
        fs::write(&path, "Contract with {Name} dated {дата договора}\n").unwrap();
        let payloads = dir.path().join("payloads");
        fs::create_dir_all(&payloads).unwrap();

        let outcome = process_file(
            &path,
            &NormalizeOptions::default(),
            &args(true, Some(payloads.clone())),
            1024,
        )
        .unwrap();
        assert!(outcome.changed);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Contract with {{Name}} dated {{дата_договора}}\n"
        );

        let payload: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(payloads.join("contract.payload.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            payload,
            serde_json::json!({ "Name": "<Name>", "дата_договора": "<дата договора>" })
        );

        // second pass has nothing left to do
        let again = process_file(&path, &NormalizeOptions::default(), &args(true, None), 1024).unwrap();
        assert!(!again.changed);
        assert!(again.renames.is_empty());
    }

    #[test]
    fn test_payload_path() {
        assert_eq!(
            payload_path(Path::new("out"), Path::new("docs/letter.json")),
            Path::new("out").join("letter.payload.json")
        );
    }
}
