//! Subcommands.

pub mod check;
pub mod normalize;
pub mod scan;
pub mod schema;
pub mod validate;

use crate::config::CONFIG_FILE_NAME;
use glob::glob;
use ignore::Walk;
use std::path::{Path, PathBuf};

/// Suffix of payload templates written by `normalize --payload-dir`
pub const PAYLOAD_SUFFIX: &str = ".payload.json";

/// Collect template files using glob patterns or directory walking.
pub fn collect_documents(patterns: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = patterns
        .iter()
        .flat_map(|pattern| {
            // Check if pattern contains glob characters
            if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
                glob(pattern)
                    .ok()
                    .into_iter()
                    .flatten()
                    .filter_map(|r| r.ok())
                    .filter(|p| is_template(p))
                    .collect::<Vec<_>>()
            } else {
                // Use directory walking for paths (respects .gitignore)
                Walk::new(pattern)
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_some_and(|t| t.is_file()) && is_template(e.path()))
                    .map(|e| e.path().to_path_buf())
                    .collect::<Vec<_>>()
            }
        })
        .collect();

    // Remove duplicates
    files.sort();
    files.dedup();
    files
}

fn is_template(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name == CONFIG_FILE_NAME || name.ends_with(PAYLOAD_SUFFIX) {
        return false;
    }
    if path.components().any(|c| c.as_os_str() == "node_modules") {
        return false;
    }
    path.extension()
        .is_some_and(|ext| ext == "json" || ext == "txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_documents() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        for file in [
            "a.txt",
            "b.json",
            "nested/c.txt",
            "notes.md",
            CONFIG_FILE_NAME,
            "b.payload.json",
            "node_modules/pkg/d.txt",
        ] {
            fs::write(root.join(file), "{{ x }}").unwrap();
        }

        let walked = collect_documents(&[root.to_string_lossy().to_string()]);
        let names: Vec<_> = walked
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.txt", "b.json", "nested/c.txt"]);

        let pattern = format!("{}/**/*.txt", root.display());
        let globbed = collect_documents(&[pattern.clone(), pattern]);
        assert_eq!(globbed.len(), 2);
    }
}
