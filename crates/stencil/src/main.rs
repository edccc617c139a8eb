//! # stencil
//!
//! Stencil - Placeholder discovery and legacy syntax migration for document templates.
//!
//! ## Name Origin
//!
//! A **stencil** is a sheet with shapes cut out of it: whatever is painted
//! through the holes lands on the page, the rest stays covered. A document
//! template works the same way, with placeholders as the holes. This crate is
//! the command-line gateway to finding those holes, describing what fills them
//! and repairing templates written in the older single-brace syntax.

mod commands;
mod config;
mod loader;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "Placeholder discovery and legacy syntax migration for document templates", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file path (default: ./stencil.config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the variable catalog of each template
    #[command(visible_alias = "croquis")]
    Scan(commands::scan::ScanArgs),

    /// Rewrite legacy `{Name}` placeholders as `{{Name}}`
    #[command(visible_alias = "glyph")]
    Normalize(commands::normalize::NormalizeArgs),

    /// Report legacy placeholders and malformed delimiters
    Check(commands::check::CheckArgs),

    /// Check a JSON payload against a template
    Validate(commands::validate::ValidateArgs),

    /// Print the JSON Schema of stencil.config.json
    Schema(commands::schema::SchemaArgs),
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load_config(cli.config.as_deref(), None);

    match cli.command {
        Commands::Scan(args) => commands::scan::run(args, &config),
        Commands::Normalize(args) => commands::normalize::run(args, &config),
        Commands::Check(args) => commands::check::run(args, &config),
        Commands::Validate(args) => commands::validate::run(args, &config),
        Commands::Schema(args) => commands::schema::run(args),
    }
}
