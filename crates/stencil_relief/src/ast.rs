//! Placeholder match types.
//!
//! A scan produces flat, ordered lists of lexical hits. Nothing here knows about
//! variable kinds; that is decided later by `stencil_croquis`.

use serde::{Deserialize, Serialize};
use stencil_carton::{split_root, CompactString};

/// Which lexical form produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum PlaceholderKind {
    /// `{{ name }}` or `{{ name | filter }}`
    Simple = 0,
    /// `{% for iterator in collection %}`
    LoopOpen = 1,
    /// `{% if name %}`
    IfOpen = 2,
}

/// One lexical hit in flattened document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderMatch {
    pub kind: PlaceholderKind,
    /// Substitution name, loop collection, or condition name
    pub captured_name: CompactString,
    /// Character offset of the match start
    pub offset: usize,
    /// Iteration variable bound by a loop opener
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterator: Option<CompactString>,
}

impl PlaceholderMatch {
    #[inline]
    pub fn simple(name: impl Into<CompactString>, offset: usize) -> Self {
        Self {
            kind: PlaceholderKind::Simple,
            captured_name: name.into(),
            offset,
            iterator: None,
        }
    }

    #[inline]
    pub fn loop_open(
        collection: impl Into<CompactString>,
        iterator: impl Into<CompactString>,
        offset: usize,
    ) -> Self {
        Self {
            kind: PlaceholderKind::LoopOpen,
            captured_name: collection.into(),
            offset,
            iterator: Some(iterator.into()),
        }
    }

    #[inline]
    pub fn if_open(name: impl Into<CompactString>, offset: usize) -> Self {
        Self {
            kind: PlaceholderKind::IfOpen,
            captured_name: name.into(),
            offset,
            iterator: None,
        }
    }

    /// Portion of the captured name before the first `.`
    #[inline]
    pub fn root(&self) -> &str {
        split_root(&self.captured_name).0
    }

    /// Portion of the captured name after the first `.` (empty if undotted)
    #[inline]
    pub fn field(&self) -> &str {
        split_root(&self.captured_name).1
    }
}

/// The three ordered match sequences of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub simple: Vec<PlaceholderMatch>,
    pub loops: Vec<PlaceholderMatch>,
    pub conditionals: Vec<PlaceholderMatch>,
    /// Character offsets of `{% endfor %}` closers, ascending
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub loop_ends: Vec<usize>,
}

impl ScanResult {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.simple.is_empty() && self.loops.is_empty() && self.conditionals.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.simple.len() + self.loops.len() + self.conditionals.len()
    }

    /// Character span `(open, close)` of every loop, matched innermost first
    /// the way nested `for` blocks pair with `endfor`. A loop that is never
    /// closed runs to the end of the text (`close` is `usize::MAX`).
    pub fn loop_spans(&self) -> Vec<(&PlaceholderMatch, usize, usize)> {
        let mut spans = Vec::with_capacity(self.loops.len());
        let mut open: Vec<&PlaceholderMatch> = Vec::new();
        let mut ends = self.loop_ends.iter().copied().peekable();

        for opener in &self.loops {
            while let Some(end) = ends.next_if(|&end| end < opener.offset) {
                if let Some(closed) = open.pop() {
                    spans.push((closed, closed.offset, end));
                }
            }
            open.push(opener);
        }
        for end in ends {
            if let Some(closed) = open.pop() {
                spans.push((closed, closed.offset, end));
            }
        }
        spans.extend(open.into_iter().rev().map(|m| (m, m.offset, usize::MAX)));
        spans
    }

    /// Iterate over every match: substitutions, then loops, then conditionals.
    pub fn iter(&self) -> impl Iterator<Item = &PlaceholderMatch> {
        self.simple
            .iter()
            .chain(self.loops.iter())
            .chain(self.conditionals.iter())
    }
}
