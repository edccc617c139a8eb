//! Schema command - Print or write the JSON Schema of the configuration file

use crate::config::STENCIL_CONFIG_SCHEMA;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct SchemaArgs {
    /// Write the schema to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: SchemaArgs) {
    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, STENCIL_CONFIG_SCHEMA) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", STENCIL_CONFIG_SCHEMA),
    }
}
