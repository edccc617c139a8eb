//! Validate command - Check a JSON payload against a template's catalog

use crate::config::StencilConfig;
use crate::loader::load_document;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use stencil_armature::Scanner;
use stencil_croquis::{analyze_source, validate, PayloadIssue};

#[derive(Args)]
pub struct ValidateArgs {
    /// Template file (.json document or .txt)
    pub template: PathBuf,

    /// JSON payload to check
    pub payload: PathBuf,
}

pub fn run(args: ValidateArgs, config: &StencilConfig) {
    match validate_files(&args.template, &args.payload, config) {
        Ok(issues) if issues.is_empty() => {
            eprintln!(
                "{} matches {}",
                args.payload.display(),
                args.template.display()
            );
        }
        Ok(issues) => {
            for issue in &issues {
                println!("{}", issue);
            }
            eprintln!();
            eprintln!("{} issue(s) found", issues.len());
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    }
}

fn validate_files(
    template: &Path,
    payload: &Path,
    config: &StencilConfig,
) -> Result<Vec<PayloadIssue>, String> {
    let scanner = Scanner::new(&config.scan.scanner_options()).map_err(|e| e.to_string())?;
    let document = load_document(template, config.max_file_size).map_err(|e| e.to_string())?;
    let croquis = analyze_source(&scanner, &config.scan.analyzer_options(), &document)
        .map_err(|e| e.to_string())?;

    let source = fs::read_to_string(payload)
        .map_err(|e| format!("Failed to read {}: {}", payload.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&source)
        .map_err(|e| format!("Failed to parse {}: {}", payload.display(), e))?;

    Ok(validate(&croquis.catalog, &value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_files() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("letter.txt");
        let payload = dir.path().join("letter.payload.json");
        fs::write(
            &template,
            "Hello {{name}}. {% for item in items %}{{item.title}}{% endfor %} {% if vip %}VIP{% endif %}",
        )
        .unwrap();

        fs::write(&payload, r#"{"name":"Ann","items":[{"title":"Tea"}],"vip":true}"#).unwrap();
        let issues = validate_files(&template, &payload, &StencilConfig::default()).unwrap();
        assert!(issues.is_empty());

        fs::write(&payload, r#"{"name":"Ann","items":[{}],"vip":"no"}"#).unwrap();
        let issues: Vec<String> = validate_files(&template, &payload, &StencilConfig::default())
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            issues,
            vec!["items[0].title: missing", "vip: expected boolean, found string"]
        );
    }

    #[test]
    fn test_unparsable_payload() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("t.txt");
        let payload = dir.path().join("p.json");
        fs::write(&template, "{{ a }}").unwrap();
        fs::write(&payload, "{").unwrap();

        let err = validate_files(&template, &payload, &StencilConfig::default()).unwrap_err();
        assert!(err.starts_with("Failed to parse"));
    }
}
