//! Single-brace placeholder rewriting.
//!
//! Older templates write placeholders as `{Full Name}`. The normalizer finds
//! these, turns the body into a valid name and rewrites them as
//! `{{Full_Name}}`. Double-brace placeholders, control tags `{% ... %}` and
//! comments `{# ... #}` are never touched, so running it twice is a no-op.

use memchr::{memchr, memchr2};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use stencil_carton::char_codes::{LEFT_BRACE, NUMBER, PERCENT, RIGHT_BRACE};
use stencil_carton::{SUBST_CLOSE, SUBST_OPEN};
use stencil_relief::RenameTable;

static SEPARATOR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-]+").expect("separator pattern is valid"));
static UNDERSCORE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+").expect("underscore pattern is valid"));

/// Turn a legacy placeholder body into a name.
///
/// Runs of whitespace and `-` become `_`, surrounding `_` are trimmed and runs
/// of `_` collapse to one.
///
/// ```
/// use stencil_glyph::normalize_name;
///
/// assert_eq!(normalize_name("Full Name"), "Full_Name");
/// assert_eq!(normalize_name("a--  -b"), "a_b");
/// ```
pub fn normalize_name(body: &str) -> String {
    let separated = SEPARATOR_RUN_RE.replace_all(body, "_");
    let trimmed = separated.trim_matches('_');
    UNDERSCORE_RUN_RE.replace_all(trimmed, "_").into_owned()
}

/// A single-brace span found in a fragment (byte range, braces included)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

impl Span {
    #[inline]
    fn body<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start + 1..self.end - 1]
    }
}

/// Find `{body}` spans where the opening brace does not follow a `{`, the
/// closing brace is not followed by a `}` and the body has no braces.
fn single_brace_spans(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(found) = memchr(LEFT_BRACE, &bytes[pos..]) {
        let start = pos + found;
        if start > 0 && bytes[start - 1] == LEFT_BRACE {
            pos = start + 1;
            continue;
        }

        let body_start = start + 1;
        let Some(offset) = memchr2(LEFT_BRACE, RIGHT_BRACE, &bytes[body_start..]) else {
            break;
        };
        let close = body_start + offset;

        if bytes[close] == LEFT_BRACE {
            pos = close;
            continue;
        }
        if close == body_start || bytes.get(close + 1) == Some(&RIGHT_BRACE) {
            pos = body_start;
            continue;
        }

        spans.push(Span {
            start,
            end: close + 1,
        });
        pos = close + 1;
    }

    spans
}

/// A legacy placeholder that should be rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyPlaceholder {
    /// Character offset of the opening brace
    pub offset: usize,
    /// Body as written, whitespace included
    pub original: String,
    pub normalized: String,
}

/// Spans that are legacy placeholders, with their normalized names.
fn legacy_spans(text: &str) -> impl Iterator<Item = (Span, String)> + '_ {
    single_brace_spans(text).into_iter().filter_map(move |span| {
        let body = span.body(text);
        if matches!(body.as_bytes().first(), Some(&PERCENT) | Some(&NUMBER)) {
            return None;
        }
        let normalized = normalize_name(body);
        if normalized.is_empty() {
            return None;
        }
        Some((span, normalized))
    })
}

/// List the legacy placeholders remaining in `text`.
pub fn find_legacy_placeholders(text: &str) -> Vec<LegacyPlaceholder> {
    let mut chars = 0;
    let mut last = 0;
    legacy_spans(text)
        .map(|(span, normalized)| {
            chars += text[last..span.start].chars().count();
            last = span.start;
            LegacyPlaceholder {
                offset: chars,
                original: span.body(text).to_string(),
                normalized,
            }
        })
        .collect()
}

/// Normalization result for one fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentResult {
    /// The rewritten text
    pub text: String,

    /// Whether anything was rewritten
    pub changed: bool,

    /// Every placeholder rewritten, including names that were already valid
    pub renames: RenameTable,
}

/// Rewrite every legacy placeholder of one fragment.
///
/// ```
/// use stencil_glyph::normalize_fragment;
///
/// let result = normalize_fragment("Contract with {Name} dated {дата договора}");
/// assert_eq!(result.text, "Contract with {{Name}} dated {{дата_договора}}");
/// assert_eq!(result.renames.get("дата договора"), Some("дата_договора"));
/// ```
pub fn normalize_fragment(text: &str) -> FragmentResult {
    let mut output = String::with_capacity(text.len() + 8);
    let mut renames = RenameTable::new();
    let mut last = 0;

    for (span, normalized) in legacy_spans(text) {
        output.push_str(&text[last..span.start]);
        output.push_str(SUBST_OPEN);
        output.push_str(&normalized);
        output.push_str(SUBST_CLOSE);
        renames.insert(span.body(text), normalized);
        last = span.end;
    }

    if last == 0 {
        return FragmentResult {
            text: text.to_string(),
            changed: false,
            renames,
        };
    }

    output.push_str(&text[last..]);
    FragmentResult {
        text: output,
        changed: true,
        renames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(text: &str) -> Vec<&str> {
        single_brace_spans(text)
            .into_iter()
            .map(|span| span.body(text))
            .collect()
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Full Name"), "Full_Name");
        assert_eq!(normalize_name("дата-договора"), "дата_договора");
        assert_eq!(normalize_name("__x__"), "x");
        assert_eq!(normalize_name("a--  -b"), "a_b");
        assert_eq!(normalize_name("a_ _b"), "a_b");
        assert_eq!(normalize_name(" padded\tname "), "padded_name");
        assert_eq!(normalize_name("Name"), "Name");
        assert_eq!(normalize_name(" - "), "");
    }

    #[test]
    fn test_single_brace_spans() {
        assert_eq!(bodies("{a} and {b c}"), vec!["a", "b c"]);
        assert_eq!(bodies("{{a}} {{ b }}"), Vec::<&str>::new());
        assert_eq!(bodies("{{a} {b}}"), Vec::<&str>::new());
        assert_eq!(bodies("{{a} {b}"), vec!["b"]);
        assert_eq!(bodies("{} {x"), Vec::<&str>::new());
        assert_eq!(bodies("{ {x}"), vec!["x"]);
        assert_eq!(bodies("{% if a %}"), vec!["% if a %"]);
    }

    #[test]
    fn test_contract_fragment() {
        let result = normalize_fragment("Contract with {Name} dated {дата договора}");
        assert!(result.changed);
        assert_eq!(result.text, "Contract with {{Name}} dated {{дата_договора}}");
        let renames: Vec<_> = result.renames.iter().collect();
        assert_eq!(
            renames,
            vec![("Name", "Name"), ("дата договора", "дата_договора")]
        );
    }

    #[test]
    fn test_double_braces_untouched() {
        let text = "Hello {{ name }}. {% for item in items %}{{ item.title }}{% endfor %} {# note #}";
        let result = normalize_fragment(text);
        assert!(!result.changed);
        assert_eq!(result.text, text);
        assert!(result.renames.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let text = "{Full Name}, {a--b} {{kept}} {x}{y} { } {%raw%}";
        let once = normalize_fragment(text);
        let twice = normalize_fragment(&once.text);
        assert_eq!(once.text, "{{Full_Name}}, {{a_b}} {{kept}} {{x}}{{y}} { } {%raw%}");
        assert!(!twice.changed);
        assert_eq!(twice.text, once.text);
        assert_eq!(normalize_fragment(text), once);
    }

    #[test]
    fn test_empty_names_not_recorded() {
        let result = normalize_fragment("{ } {--} {__}");
        assert!(!result.changed);
        assert!(result.renames.is_empty());
    }

    #[test]
    fn test_last_write_wins_within_fragment() {
        let result = normalize_fragment("{a b} {a b}");
        assert_eq!(result.text, "{{a_b}} {{a_b}}");
        assert_eq!(result.renames.len(), 1);
    }

    #[test]
    fn test_find_legacy_placeholders() {
        let found = find_legacy_placeholders("Дата {дата договора}, {{ ok }} {Name}");
        assert_eq!(
            found,
            vec![
                LegacyPlaceholder {
                    offset: 5,
                    original: "дата договора".to_string(),
                    normalized: "дата_договора".to_string(),
                },
                LegacyPlaceholder {
                    offset: 31,
                    original: "Name".to_string(),
                    normalized: "Name".to_string(),
                },
            ]
        );
        assert!(find_legacy_placeholders("{{ a }} {% if b %}").is_empty());
    }
}
