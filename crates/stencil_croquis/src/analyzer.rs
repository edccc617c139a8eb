//! Variable classifier.
//!
//! The [`Analyzer`] folds one or more [`ScanResult`]s into a catalog of root
//! variables. Every occurrence runs through an ordered chain of guards and the
//! resulting kind is merged into the catalog with a no-downgrade rule. An
//! upgrade keeps the fields already recorded, cut to their first segment when
//! the root becomes an array:
//!
//! ```text
//! reserved root            -> skipped
//! root is a loop collection -> array (first field segment recorded)
//! iterator inside its loop  -> array of that loop's collection
//! dotted name               -> object (whole field path recorded)
//! root guards an `if`       -> boolean
//! otherwise                 -> simple
//! ```
//!
//! ## Usage
//!
//! ```
//! use stencil_armature::scan;
//! use stencil_croquis::Analyzer;
//!
//! let mut analyzer = Analyzer::new();
//! analyzer.analyze(&scan("{% for row in rows %}{{ row.total }}{% endfor %}"));
//! let croquis = analyzer.finish();
//! assert_eq!(croquis.catalog.kind("rows").unwrap().as_str(), "array");
//! ```

use crate::analysis::Croquis;
use crate::builtins::is_reserved_name;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use stencil_carton::{first_segment, CompactString, FxHashMap, FxHashSet};
use stencil_relief::{Diagnostic, PlaceholderMatch, ScanResult, VariableEntry, VariableKind};

/// Classifier options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerOptions {
    /// Root names to skip in addition to the engine's reserved names
    #[serde(default)]
    pub reserved: Vec<String>,

    /// Attribute `item.field` inside `{% for item in items %}` to `items` (default: true)
    #[serde(default = "default_true")]
    pub resolve_loop_iterators: bool,

    /// Run the delimiter lint when analyzing text or documents (default: false)
    #[serde(default)]
    pub lint: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            reserved: Vec::new(),
            resolve_loop_iterators: true,
            lint: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Variable classifier
#[derive(Debug, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
    reserved: FxHashSet<CompactString>,
    entries: FxHashMap<CompactString, VariableEntry>,
    diagnostics: Vec<Diagnostic>,
}

impl Analyzer {
    /// Create an analyzer with default options
    #[inline]
    pub fn new() -> Self {
        Self::with_options(AnalyzerOptions::default())
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        let reserved = options.reserved.iter().map(CompactString::new).collect();
        Self {
            options,
            reserved,
            entries: FxHashMap::default(),
            diagnostics: Vec::new(),
        }
    }

    #[inline]
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// Classify every occurrence of one scan.
    ///
    /// Loop and conditional names are only visible to occurrences of the same
    /// scan; analyzing several scans merges their catalogs.
    pub fn analyze(&mut self, scan: &ScanResult) -> &mut Self {
        let context = ScanContext::new(scan);
        for occurrence in scan.iter() {
            if let Some((root, kind)) = self.classify(occurrence, &context) {
                self.merge(root, kind, occurrence.offset);
            }
        }
        self
    }

    /// Attach diagnostics to the result
    pub fn add_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) -> &mut Self {
        self.diagnostics.extend(diagnostics);
        self
    }

    /// Finish analysis and return the result
    pub fn finish(self) -> Croquis {
        Croquis {
            catalog: self.entries.into_iter().collect(),
            diagnostics: self.diagnostics,
        }
    }

    #[inline]
    fn is_reserved(&self, root: &str) -> bool {
        is_reserved_name(root) || self.reserved.contains(root)
    }

    fn classify<'s>(
        &self,
        occurrence: &'s PlaceholderMatch,
        context: &ScanContext<'s>,
    ) -> Option<(&'s str, VariableKind)> {
        let (root, field) = (occurrence.root(), occurrence.field());
        if root.is_empty() {
            return None;
        }
        if self.is_reserved(root) {
            tracing::debug!(name = %occurrence.captured_name, "skipping reserved name");
            return None;
        }

        if context.collections.contains(root) {
            return Some((root, array_with(field)));
        }

        if self.options.resolve_loop_iterators {
            if let Some(collection) = context.collection_for(root, occurrence.offset) {
                if self.is_reserved(collection) {
                    return None;
                }
                return Some((collection, array_with(field)));
            }
        }

        if !field.is_empty() {
            let mut fields = BTreeSet::new();
            fields.insert(CompactString::new(field));
            return Some((root, VariableKind::Object { fields }));
        }

        if context.conditions.contains(root) {
            return Some((root, VariableKind::Boolean));
        }

        Some((root, VariableKind::Simple))
    }

    fn merge(&mut self, root: &str, kind: VariableKind, offset: usize) {
        let Some(entry) = self.entries.get_mut(root) else {
            self.entries
                .insert(CompactString::new(root), VariableEntry::new(kind, offset));
            return;
        };

        entry.first_offset = entry.first_offset.min(offset);
        match kind.rank().cmp(&entry.kind.rank()) {
            Ordering::Greater => {
                let previous = std::mem::replace(&mut entry.kind, kind);
                carry_fields(&mut entry.kind, &previous);
            }
            Ordering::Equal => {
                if let (Some(existing), Some(added)) = (entry.kind.fields_mut(), kind.fields()) {
                    existing.extend(added.iter().cloned());
                }
            }
            Ordering::Less => {}
        }
    }
}

fn array_with(field: &str) -> VariableKind {
    let mut fields = BTreeSet::new();
    let segment = first_segment(field);
    if !segment.is_empty() {
        fields.insert(CompactString::new(segment));
    }
    VariableKind::Array { fields }
}

fn carry_fields(kind: &mut VariableKind, previous: &VariableKind) {
    let array = matches!(kind, VariableKind::Array { .. });
    if let (Some(fields), Some(carried)) = (kind.fields_mut(), previous.fields()) {
        for field in carried {
            let field = if array { first_segment(field) } else { field.as_str() };
            if !field.is_empty() {
                fields.insert(CompactString::new(field));
            }
        }
    }
}

/// A loop iterator and the character span of its body
struct LoopBinding<'s> {
    iterator: &'s str,
    collection: &'s str,
    open: usize,
    close: usize,
}

/// Loop and conditional names of one scan
struct ScanContext<'s> {
    collections: FxHashSet<&'s str>,
    conditions: FxHashSet<&'s str>,
    bindings: Vec<LoopBinding<'s>>,
}

impl<'s> ScanContext<'s> {
    fn new(scan: &'s ScanResult) -> Self {
        let collections = scan.loops.iter().map(|m| m.captured_name.as_str()).collect();
        let conditions = scan
            .conditionals
            .iter()
            .map(|m| m.captured_name.as_str())
            .collect();
        let bindings = scan
            .loop_spans()
            .into_iter()
            .filter_map(|(m, open, close)| {
                Some(LoopBinding {
                    iterator: m.iterator.as_deref()?,
                    collection: m.captured_name.as_str(),
                    open,
                    close,
                })
            })
            .collect();
        Self {
            collections,
            conditions,
            bindings,
        }
    }

    /// Collection of the innermost loop around `offset` that binds `iterator`
    fn collection_for(&self, iterator: &str, offset: usize) -> Option<&'s str> {
        self.bindings
            .iter()
            .filter(|b| b.iterator == iterator && b.open < offset && offset < b.close)
            .max_by_key(|b| b.open)
            .map(|b| b.collection)
    }
}
