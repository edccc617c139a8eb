//! Scan command - Print the variable catalog of each template

use crate::config::StencilConfig;
use crate::loader::TemplateFile;
use clap::{Args, ValueEnum};
use rayon::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::PathBuf;
use stencil_armature::Scanner;
use stencil_croquis::{analyze_batch, skeleton, AnalyzerOptions, BatchItem, Croquis};
use stencil_relief::CatalogOrder;

#[derive(Args)]
pub struct ScanArgs {
    /// Files, directories or glob patterns of templates (.json documents, .txt files)
    #[arg(default_value = ".")]
    pub patterns: Vec<String>,

    /// Catalog order (default: from config, else alpha)
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Also print an example payload for each template
    #[arg(long)]
    pub skeleton: bool,

    /// Report malformed delimiters and invalid placeholder names
    #[arg(long)]
    pub lint: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// By name
    Alpha,
    /// By first appearance in the document
    FirstSeen,
    /// Simple variables first, as a data-entry form shows them
    Form,
}

impl From<OrderArg> for CatalogOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Alpha => CatalogOrder::Alphabetical,
            OrderArg::FirstSeen => CatalogOrder::FirstSeen,
            OrderArg::Form => CatalogOrder::Form,
        }
    }
}

/// Catalog of one file, as printed
pub struct ScanReport {
    pub file: String,
    pub order: CatalogOrder,
    pub croquis: Croquis,
    pub with_skeleton: bool,
}

impl Serialize for ScanReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("file", &self.file)?;
        map.serialize_entry("catalog", &self.croquis.catalog.view(self.order))?;
        if self.with_skeleton {
            map.serialize_entry("skeleton", &skeleton(&self.croquis.catalog))?;
        }
        if !self.croquis.diagnostics.is_empty() {
            map.serialize_entry("diagnostics", &self.croquis.diagnostics)?;
        }
        map.end()
    }
}

pub fn run(args: ScanArgs, config: &StencilConfig) {
    let scanner = match Scanner::new(&config.scan.scanner_options()) {
        Ok(scanner) => scanner,
        Err(e) => {
            eprintln!("Invalid scan configuration: {}", e);
            std::process::exit(1);
        }
    };
    let options = AnalyzerOptions {
        lint: args.lint,
        ..config.scan.analyzer_options()
    };
    let order = args.order.map_or(config.scan.order, CatalogOrder::from);

    let files = super::collect_documents(&args.patterns);
    if files.is_empty() {
        eprintln!("No template files found matching patterns: {:?}", args.patterns);
        return;
    }

    let mut errored = 0usize;
    let reports: Vec<ScanReport> = scan_files(&files, &scanner, &options, config.max_file_size)
        .into_iter()
        .map(|item| {
            if item.croquis.has_errors() {
                errored += 1;
                for diagnostic in item.croquis.diagnostics.iter().filter(|d| d.is_error()) {
                    eprintln!("Error scanning {}", diagnostic.message);
                }
            }
            ScanReport {
                file: item.name,
                order,
                croquis: item.croquis,
                with_skeleton: args.skeleton,
            }
        })
        .collect();

    match serde_json::to_string_pretty(&reports) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize catalogs: {}", e);
            std::process::exit(1);
        }
    }

    let variables: usize = reports.iter().map(|r| r.croquis.catalog.len()).sum();
    eprintln!();
    eprintln!(
        "Scanned {} file(s), {} variable(s) found",
        files.len(),
        variables
    );
    if errored > 0 {
        eprintln!("  {} file(s) had errors", errored);
        std::process::exit(1);
    }
}

/// Analyze files in parallel, sorted by name. A file that cannot be loaded
/// comes back with an empty catalog and a `source-unavailable` diagnostic.
fn scan_files(
    files: &[PathBuf],
    scanner: &Scanner,
    options: &AnalyzerOptions,
    max_file_size: u64,
) -> Vec<BatchItem> {
    let mut items: Vec<BatchItem> = files
        .par_iter()
        .flat_map_iter(|path| {
            let name = path.display().to_string();
            let file = TemplateFile::new(path, max_file_size);
            analyze_batch(scanner, options, [(name.as_str(), &file)])
        })
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    items
}
