//! The lexical pattern set.
//!
//! The default patterns are compile-time constants compiled once on first use.
//! A [`PatternSet`] is a plain value handed to the scanner, so alternative
//! patterns can come from configuration without any process-wide state.

use crate::error::ScanError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `{{ name }}`, `{{ a.b.c }}`, `{{ name | filter(...) }}`
///
/// Group 1: the (possibly dotted) name.
pub const SIMPLE_PATTERN: &str =
    r"\{\{\s*([A-Za-zА-Яа-яЁё_][A-Za-zА-Яа-яЁё0-9_.]*)\s*(?:\|[^}]*)?\}\}";

/// `{% for item in items %}`
///
/// Group 1: the iterator. Group 2: the collection.
pub const LOOP_PATTERN: &str =
    r"\{%\s*for\s+(\w+)\s+in\s+([A-Za-zА-Яа-яЁё_][A-Za-zА-Яа-яЁё0-9_]*)\s*%\}";

/// `{% endfor %}`
pub const LOOP_CLOSE_PATTERN: &str = r"\{%\s*endfor\s*%\}";

/// `{% if flag %}`
///
/// Group 1: the condition name.
pub const IF_PATTERN: &str = r"\{%\s*if\s+([A-Za-zА-Яа-яЁё_][A-Za-zА-Яа-яЁё0-9_]*)\s*%\}";

static SIMPLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(SIMPLE_PATTERN).expect("substitution pattern is valid"));
static LOOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(LOOP_PATTERN).expect("loop pattern is valid"));
static LOOP_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(LOOP_CLOSE_PATTERN).expect("loop close pattern is valid"));
static IF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(IF_PATTERN).expect("if pattern is valid"));

/// Pattern sources, as they appear in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSources {
    #[serde(default = "default_simple")]
    pub simple: String,
    #[serde(default = "default_loop_open")]
    pub loop_open: String,
    #[serde(default = "default_loop_close")]
    pub loop_close: String,
    #[serde(default = "default_if_open")]
    pub if_open: String,
}

impl Default for PatternSources {
    fn default() -> Self {
        Self {
            simple: default_simple(),
            loop_open: default_loop_open(),
            loop_close: default_loop_close(),
            if_open: default_if_open(),
        }
    }
}

fn default_simple() -> String {
    SIMPLE_PATTERN.to_string()
}

fn default_loop_open() -> String {
    LOOP_PATTERN.to_string()
}

fn default_loop_close() -> String {
    LOOP_CLOSE_PATTERN.to_string()
}

fn default_if_open() -> String {
    IF_PATTERN.to_string()
}

/// Compiled patterns used by a scanner
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub(crate) simple: Regex,
    pub(crate) loop_open: Regex,
    pub(crate) loop_close: Regex,
    pub(crate) if_open: Regex,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            simple: SIMPLE_RE.clone(),
            loop_open: LOOP_RE.clone(),
            loop_close: LOOP_CLOSE_RE.clone(),
            if_open: IF_RE.clone(),
        }
    }
}

impl PatternSet {
    /// Compile a pattern set, reusing the built-in regexes for default sources.
    pub fn compile(sources: &PatternSources) -> Result<Self, ScanError> {
        if *sources == PatternSources::default() {
            return Ok(Self::default());
        }

        Ok(Self {
            simple: compile_one("substitution", &sources.simple, 1)?,
            loop_open: compile_one("loop", &sources.loop_open, 2)?,
            loop_close: compile_one("loop close", &sources.loop_close, 0)?,
            if_open: compile_one("if", &sources.if_open, 1)?,
        })
    }
}

fn compile_one(which: &'static str, source: &str, groups: usize) -> Result<Regex, ScanError> {
    let regex = Regex::new(source).map_err(|source| ScanError::InvalidPattern { which, source })?;
    // captures_len counts the implicit whole-match group
    let found = regex.captures_len() - 1;
    if found < groups {
        return Err(ScanError::CaptureGroups {
            which,
            expected: groups,
            found,
        });
    }
    Ok(regex)
}
