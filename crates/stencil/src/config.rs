//! Configuration file loading for stencil.
//!
//! Reads `stencil.config.json` from the current working directory, or the file
//! given with `--config`. Also provides the JSON Schema of the file for editor
//! autocompletion.

use serde::{Deserialize, Serialize};
use std::path::Path;
use stencil_armature::{PatternSources, ScannerOptions};
use stencil_croquis::AnalyzerOptions;
use stencil_glyph::NormalizeOptions;
use stencil_relief::CatalogOrder;

pub const CONFIG_FILE_NAME: &str = "stencil.config.json";

const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Top-level stencil configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StencilConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Scanning and classification configuration.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Normalization configuration.
    #[serde(default)]
    pub normalize: NormalizeOptions,

    /// Files larger than this many bytes are skipped.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for StencilConfig {
    fn default() -> Self {
        Self {
            schema: None,
            scan: ScanConfig::default(),
            normalize: NormalizeOptions::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

/// Configuration for the `scan`, `check` and `validate` commands.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    /// Text placed between paragraphs when a document is flattened.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Root names that belong to the template engine, not the payload.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reserved: Vec<String>,

    /// Catalog output order.
    #[serde(default)]
    pub order: CatalogOrder,

    /// Replacement placeholder patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<PatternSources>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            reserved: Vec::new(),
            order: CatalogOrder::default(),
            patterns: None,
        }
    }
}

fn default_separator() -> String {
    " ".to_string()
}

impl ScanConfig {
    pub fn scanner_options(&self) -> ScannerOptions {
        ScannerOptions {
            separator: self.separator.clone(),
            patterns: self.patterns.clone().unwrap_or_default(),
        }
    }

    pub fn analyzer_options(&self) -> AnalyzerOptions {
        AnalyzerOptions {
            reserved: self.reserved.clone(),
            ..Default::default()
        }
    }
}

/// Load the configuration.
///
/// An explicit path is read as given; otherwise `stencil.config.json` is
/// looked up in `dir` (or the CWD). A missing file yields the defaults, as does
/// an unreadable or invalid one after a warning.
pub fn load_config(explicit: Option<&Path>, dir: Option<&Path>) -> StencilConfig {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let base = dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
            base.join(CONFIG_FILE_NAME)
        }
    };

    if !config_path.exists() {
        if explicit.is_some() {
            warn_defaults(&config_path, "file does not exist");
        }
        return StencilConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %config_path.display(), "loaded configuration");
                config
            }
            Err(e) => {
                warn_defaults(&config_path, &format!("failed to parse: {e}"));
                StencilConfig::default()
            }
        },
        Err(e) => {
            warn_defaults(&config_path, &format!("failed to read: {e}"));
            StencilConfig::default()
        }
    }
}

fn warn_defaults(path: &Path, reason: &str) {
    eprintln!(
        "\x1b[33mWarning:\x1b[0m {}: {}; using defaults",
        path.display(),
        reason
    );
}

/// JSON Schema for `stencil.config.json`.
pub const STENCIL_CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Stencil Configuration",
  "description": "Configuration file for stencil - placeholder discovery and legacy syntax migration",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "scan": {
      "type": "object",
      "description": "Scanning and classification configuration",
      "properties": {
        "separator": {
          "type": "string",
          "description": "Text placed between paragraphs when a document is flattened",
          "default": " "
        },
        "reserved": {
          "type": "array",
          "description": "Root names that belong to the template engine and never become variables. \"loop\" is always reserved.",
          "items": { "type": "string" },
          "examples": [["now", "range"]]
        },
        "order": {
          "type": "string",
          "description": "Catalog output order",
          "enum": ["alphabetical", "first-seen", "form"],
          "default": "alphabetical"
        },
        "patterns": {
          "type": "object",
          "description": "Replacement regular expressions. simple and ifOpen capture the name in group 1; loopOpen captures the iterator in group 1 and the collection in group 2. loopClose matches the end of a loop body.",
          "properties": {
            "simple": { "type": "string" },
            "loopOpen": { "type": "string" },
            "loopClose": { "type": "string" },
            "ifOpen": { "type": "string" }
          },
          "additionalProperties": false
        }
      },
      "additionalProperties": false
    },
    "normalize": {
      "type": "object",
      "description": "Normalization configuration",
      "properties": {
        "persist": {
          "type": "string",
          "description": "When normalized documents are written back",
          "enum": ["onChange", "always"],
          "default": "onChange"
        }
      },
      "additionalProperties": false
    },
    "maxFileSize": {
      "type": "integer",
      "description": "Files larger than this many bytes are skipped",
      "minimum": 0,
      "default": 16777216
    }
  },
  "additionalProperties": false
}"#;
