//! Placeholder scanner.
//!
//! Runs the three patterns of a [`PatternSet`] over the flattened text of a
//! document. Malformed delimiter sequences are not repaired: whatever the
//! patterns do not match is simply not reported.

use crate::error::ScanError;
use crate::patterns::{PatternSet, PatternSources};
use regex::Regex;
use serde::{Deserialize, Serialize};
use stencil_carton::CompactString;
use stencil_relief::{
    DocumentTextSource, PlaceholderMatch, ScanResult, SourceError, TextFragment,
};

/// Scanner options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerOptions {
    /// Text placed between fragments when a document is flattened (default: " ")
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Pattern sources (default: the built-in patterns)
    #[serde(default)]
    pub patterns: PatternSources,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            patterns: PatternSources::default(),
        }
    }
}

fn default_separator() -> String {
    " ".to_string()
}

/// Flattened text of a document together with its scan
#[derive(Debug, Clone, Default)]
pub struct DocumentScan {
    pub text: String,
    pub result: ScanResult,
}

/// Placeholder scanner
#[derive(Debug, Clone)]
pub struct Scanner {
    patterns: PatternSet,
    separator: CompactString,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::with_patterns(PatternSet::default())
    }
}

impl Scanner {
    /// Create a scanner from options, compiling any custom patterns
    pub fn new(options: &ScannerOptions) -> Result<Self, ScanError> {
        let patterns = PatternSet::compile(&options.patterns)?;
        Ok(Self {
            patterns,
            separator: CompactString::new(&options.separator),
        })
    }

    #[inline]
    pub fn with_patterns(patterns: PatternSet) -> Self {
        Self {
            patterns,
            separator: CompactString::new(" "),
        }
    }

    /// Find every substitution, loop opener and conditional opener in `text`.
    pub fn scan(&self, text: &str) -> ScanResult {
        ScanResult {
            simple: collect(&self.patterns.simple, text, |caps, offset| {
                caps.get(1)
                    .map(|name| PlaceholderMatch::simple(name.as_str(), offset))
            }),
            loops: collect(&self.patterns.loop_open, text, |caps, offset| {
                let iterator = caps.get(1)?;
                let collection = caps.get(2)?;
                Some(PlaceholderMatch::loop_open(
                    collection.as_str(),
                    iterator.as_str(),
                    offset,
                ))
            }),
            conditionals: collect(&self.patterns.if_open, text, |caps, offset| {
                caps.get(1)
                    .map(|name| PlaceholderMatch::if_open(name.as_str(), offset))
            }),
            loop_ends: offsets(&self.patterns.loop_close, text),
        }
    }

    /// Join fragment texts with the configured separator.
    pub fn flatten(&self, fragments: &[TextFragment]) -> String {
        let capacity = fragments.iter().map(|f| f.text.len()).sum::<usize>()
            + fragments.len().saturating_sub(1) * self.separator.len();
        let mut text = String::with_capacity(capacity);
        for (index, fragment) in fragments.iter().enumerate() {
            if index > 0 {
                text.push_str(&self.separator);
            }
            text.push_str(&fragment.text);
        }
        text
    }

    /// Character offset at which each fragment starts in the flattened text.
    pub fn fragment_offsets(&self, fragments: &[TextFragment]) -> Vec<usize> {
        let separator = self.separator.chars().count();
        let mut next = 0;
        fragments
            .iter()
            .map(|fragment| {
                let start = next;
                next += fragment.text.chars().count() + separator;
                start
            })
            .collect()
    }

    /// Flatten a whole document and scan it.
    pub fn scan_source<S>(&self, source: &S) -> Result<DocumentScan, SourceError>
    where
        S: DocumentTextSource + ?Sized,
    {
        let fragments = source.fragments()?;
        let text = self.flatten(&fragments);
        let result = self.scan(&text);
        Ok(DocumentScan { text, result })
    }
}

fn collect<F>(regex: &Regex, text: &str, mut build: F) -> Vec<PlaceholderMatch>
where
    F: FnMut(&regex::Captures<'_>, usize) -> Option<PlaceholderMatch>,
{
    let mut cursor = CharCursor::new(text);
    regex
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            build(&caps, cursor.advance_to(start))
        })
        .collect()
}

fn offsets(regex: &Regex, text: &str) -> Vec<usize> {
    let mut cursor = CharCursor::new(text);
    regex
        .find_iter(text)
        .map(|m| cursor.advance_to(m.start()))
        .collect()
}

/// Converts increasing byte offsets into character offsets without rescanning
/// from the start of the text each time.
pub(crate) struct CharCursor<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCursor<'a> {
    #[inline]
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    /// `byte` must not be smaller than the previous call's and must sit on a
    /// char boundary.
    #[inline]
    pub(crate) fn advance_to(&mut self, byte: usize) -> usize {
        if byte > self.byte {
            self.chars += self.text[self.byte..byte].chars().count();
            self.byte = byte;
        }
        self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_relief::{Document, FragmentId, PlaceholderKind};

    fn names(matches: &[PlaceholderMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.captured_name.as_str()).collect()
    }

    #[test]
    fn test_scan_all_forms() {
        let text = "Hello {{name}}. {% for item in items %}{{item.title}}{% endfor %} {% if vip %}VIP{% endif %}";
        let result = Scanner::default().scan(text);

        assert_eq!(names(&result.simple), vec!["name", "item.title"]);
        assert_eq!(names(&result.loops), vec!["items"]);
        assert_eq!(result.loops[0].iterator.as_deref(), Some("item"));
        assert_eq!(names(&result.conditionals), vec!["vip"]);
        assert_eq!(result.loop_ends, vec![53]);

        assert_eq!(result.simple[0].offset, 6);
        assert_eq!(result.loops[0].offset, 16);
        assert_eq!(result.simple[0].kind, PlaceholderKind::Simple);
        assert_eq!(result.conditionals[0].kind, PlaceholderKind::IfOpen);
    }

    #[test]
    fn test_whitespace_and_filters() {
        let result = Scanner::default().scan("{{   total   }} {{ price | round(2) }} {{date|format('%d.%m')}}");
        assert_eq!(names(&result.simple), vec!["total", "price", "date"]);

        let result = Scanner::default().scan("{%for   row   in   rows%}{%   if  paid   %}");
        assert_eq!(names(&result.loops), vec!["rows"]);
        assert_eq!(names(&result.conditionals), vec!["paid"]);
    }

    #[test]
    fn test_cyrillic_names() {
        let result = Scanner::default().scan("Договор с {{Фамилия_Имя_Отчество}} от {{ дата_договора }}, {{Ёлка}}");
        assert_eq!(
            names(&result.simple),
            vec!["Фамилия_Имя_Отчество", "дата_договора", "Ёлка"]
        );
    }

    #[test]
    fn test_offsets_count_characters() {
        // "Дата: " is six characters but ten bytes
        let result = Scanner::default().scan("Дата: {{date}} и {{place}}");
        assert_eq!(result.simple[0].offset, 6);
        assert_eq!(result.simple[1].offset, 17);
    }

    #[test]
    fn test_rejected_names() {
        let result = Scanner::default().scan("{{1st}} {{Full Name}} {{a-b}} {{}} {{ .x }}");
        assert!(result.simple.is_empty());

        // dotted names are only accepted for substitutions
        let result = Scanner::default().scan("{% if user.active %}{% for x in a.b %}");
        assert!(result.conditionals.is_empty());
        assert!(result.loops.is_empty());
    }

    #[test]
    fn test_case_sensitive_keywords() {
        let result = Scanner::default().scan("{% IF flag %}{% For a in b %}");
        assert!(result.is_empty());
    }

    #[test]
    fn test_plain_text() {
        assert!(Scanner::default().scan("").is_empty());
        assert!(Scanner::default().scan("No placeholders here { at all }").is_empty());
    }

    #[test]
    fn test_custom_separator_and_flatten() {
        let options = ScannerOptions {
            separator: "\n".to_string(),
            ..Default::default()
        };
        let scanner = Scanner::new(&options).unwrap();
        let fragments = vec![
            TextFragment::new(FragmentId::Body { paragraph: 0 }, "a"),
            TextFragment::new(FragmentId::Body { paragraph: 1 }, "b"),
        ];
        assert_eq!(scanner.flatten(&fragments), "a\nb");
        assert_eq!(Scanner::default().flatten(&fragments), "a b");
        assert_eq!(Scanner::default().flatten(&[]), "");
    }

    #[test]
    fn test_fragment_offsets() {
        let fragments = vec![
            TextFragment::new(FragmentId::Body { paragraph: 0 }, "Дата"),
            TextFragment::new(FragmentId::Body { paragraph: 1 }, ""),
            TextFragment::new(FragmentId::Body { paragraph: 2 }, "{{x}}"),
        ];
        let scanner = Scanner::default();
        assert_eq!(scanner.fragment_offsets(&fragments), vec![0, 5, 6]);
        let text = scanner.flatten(&fragments);
        assert_eq!(scanner.scan(&text).simple[0].offset, 6);
    }

    #[test]
    fn test_scan_source_flattens_document() {
        let document = Document::from_paragraphs(["{{a}}", "{% if b %}"]);
        let scan = Scanner::default().scan_source(&document).unwrap();
        assert_eq!(scan.text, "{{a}} {% if b %}");
        assert_eq!(scan.result.conditionals[0].offset, 6);
    }

    #[test]
    fn test_char_cursor() {
        let text = "ёжик {{x}}";
        let mut cursor = CharCursor::new(text);
        let byte = text.find("{{").unwrap();
        assert_eq!(cursor.advance_to(byte), 5);
        assert_eq!(cursor.advance_to(byte), 5);
    }
}
