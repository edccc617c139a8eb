//! Variable catalog and rename table.
//!
//! The catalog is the contract between the classifier and whatever renders a
//! data-entry form or validates a payload. It serializes to the shape
//!
//! ```text
//! {
//!   "items": { "type": "array", "fields": ["price", "title"] },
//!   "name":  { "type": "simple" },
//!   "vip":   { "type": "boolean" }
//! }
//! ```

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use stencil_carton::{CompactString, FxHashMap};

/// Classified kind of a root variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VariableKind {
    /// Plain substitution
    Simple,
    /// Used as a condition guard
    Boolean,
    /// Iterated by a loop; fields are the members accessed on each item
    Array {
        #[serde(default)]
        fields: BTreeSet<CompactString>,
    },
    /// Accessed with dotted paths; fields are the full paths after the root
    Object {
        #[serde(default)]
        fields: BTreeSet<CompactString>,
    },
}

impl VariableKind {
    #[inline]
    pub fn array() -> Self {
        Self::Array {
            fields: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn object() -> Self {
        Self::Object {
            fields: BTreeSet::new(),
        }
    }

    /// Precedence of this kind; a variable never moves to a lower rank.
    #[inline]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Simple => 0,
            Self::Boolean => 1,
            Self::Object { .. } => 2,
            Self::Array { .. } => 3,
        }
    }

    /// Field set for structured kinds
    #[inline]
    pub fn fields(&self) -> Option<&BTreeSet<CompactString>> {
        match self {
            Self::Array { fields } | Self::Object { fields } => Some(fields),
            Self::Simple | Self::Boolean => None,
        }
    }

    #[inline]
    pub fn fields_mut(&mut self) -> Option<&mut BTreeSet<CompactString>> {
        match self {
            Self::Array { fields } | Self::Object { fields } => Some(fields),
            Self::Simple | Self::Boolean => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Boolean => "boolean",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
        }
    }
}

/// One catalog entry per root variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableEntry {
    pub kind: VariableKind,
    /// Smallest character offset at which the root was seen
    pub first_offset: usize,
}

impl VariableEntry {
    #[inline]
    pub fn new(kind: VariableKind, first_offset: usize) -> Self {
        Self { kind, first_offset }
    }
}

/// Ordering used when presenting a catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogOrder {
    /// By name
    #[default]
    Alphabetical,
    /// By first appearance in the document
    FirstSeen,
    /// Simple variables first, then everything else, each group by name
    Form,
}

/// Mapping from root name to its classified entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: FxHashMap<CompactString, VariableEntry>,
}

impl Catalog {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&VariableEntry> {
        self.entries.get(name)
    }

    #[inline]
    pub fn kind(&self, name: &str) -> Option<&VariableKind> {
        self.entries.get(name).map(|entry| &entry.kind)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<CompactString>, entry: VariableEntry) {
        self.entries.insert(name.into(), entry);
    }

    /// Unordered iteration
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Entries in the requested presentation order.
    pub fn ordered(&self, order: CatalogOrder) -> Vec<(&str, &VariableEntry)> {
        let mut entries: Vec<_> = self.iter().collect();
        match order {
            CatalogOrder::Alphabetical => entries.sort_by(|a, b| a.0.cmp(b.0)),
            CatalogOrder::FirstSeen => {
                entries.sort_by(|a, b| a.1.first_offset.cmp(&b.1.first_offset).then(a.0.cmp(b.0)))
            }
            CatalogOrder::Form => entries.sort_by(|a, b| {
                let a_simple = matches!(a.1.kind, VariableKind::Simple);
                let b_simple = matches!(b.1.kind, VariableKind::Simple);
                b_simple.cmp(&a_simple).then(a.0.cmp(b.0))
            }),
        }
        entries
    }

    /// Serializable view that writes entries in the given order.
    #[inline]
    pub fn view(&self, order: CatalogOrder) -> OrderedCatalog<'_> {
        OrderedCatalog {
            entries: self.ordered(order),
        }
    }
}

/// A catalog serialized in presentation order rather than by name
#[derive(Debug, Clone)]
pub struct OrderedCatalog<'a> {
    entries: Vec<(&'a str, &'a VariableEntry)>,
}

impl Serialize for OrderedCatalog<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, &entry.kind)?;
        }
        map.end()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted: BTreeMap<&str, &VariableKind> = self
            .entries
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.kind))
            .collect();
        sorted.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    /// Offsets are not part of the serialized form; entries get their
    /// alphabetical position instead.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let sorted = BTreeMap::<CompactString, VariableKind>::deserialize(deserializer)?;
        let entries = sorted
            .into_iter()
            .enumerate()
            .map(|(position, (name, kind))| (name, VariableEntry::new(kind, position)))
            .collect();
        Ok(Self { entries })
    }
}

impl FromIterator<(CompactString, VariableEntry)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (CompactString, VariableEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Mapping from an original placeholder name to its normalized form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenameTable {
    entries: BTreeMap<CompactString, CompactString>,
}

impl RenameTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a rename. A later record for the same original name wins.
    #[inline]
    pub fn insert(&mut self, original: impl Into<CompactString>, normalized: impl Into<CompactString>) {
        self.entries.insert(original.into(), normalized.into());
    }

    #[inline]
    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(CompactString::as_str)
    }

    /// Merge another table into this one, its entries overwriting ours.
    pub fn merge(&mut self, other: RenameTable) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(original, normalized)| (original.as_str(), normalized.as_str()))
    }

    /// Only the entries whose name actually changed
    pub fn changed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(original, normalized)| original != normalized)
    }

    /// Example payload keyed by normalized name, each value naming its original
    /// placeholder: `{"Full_Name": "<Full Name>"}`.
    pub fn payload_template(&self) -> BTreeMap<CompactString, String> {
        self.iter()
            .map(|(original, normalized)| (CompactString::new(normalized), format!("<{original}>")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> BTreeSet<CompactString> {
        names.iter().map(|n| CompactString::new(n)).collect()
    }

    fn sample() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("vip", VariableEntry::new(VariableKind::Boolean, 40));
        catalog.insert("name", VariableEntry::new(VariableKind::Simple, 6));
        catalog.insert(
            "items",
            VariableEntry::new(
                VariableKind::Array {
                    fields: fields(&["title", "price"]),
                },
                15,
            ),
        );
        catalog.insert("agent", VariableEntry::new(VariableKind::Simple, 90));
        catalog
    }

    #[test]
    fn test_rank_order() {
        assert!(VariableKind::array().rank() > VariableKind::object().rank());
        assert!(VariableKind::object().rank() > VariableKind::Boolean.rank());
        assert!(VariableKind::Boolean.rank() > VariableKind::Simple.rank());
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"agent":{"type":"simple"},"items":{"type":"array","fields":["price","title"]},"name":{"type":"simple"},"vip":{"type":"boolean"}}"#
        );
    }

    #[test]
    fn test_deserialize_round_trip_kinds() {
        let json = r#"{"company":{"type":"object","fields":["address.city"]},"flag":{"type":"boolean"}}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert_eq!(
            catalog.kind("company"),
            Some(&VariableKind::Object {
                fields: fields(&["address.city"])
            })
        );
        assert_eq!(catalog.kind("flag"), Some(&VariableKind::Boolean));
    }

    #[test]
    fn test_array_without_fields_deserializes() {
        let catalog: Catalog = serde_json::from_str(r#"{"rows":{"type":"array"}}"#).unwrap();
        assert_eq!(catalog.kind("rows"), Some(&VariableKind::array()));
    }

    #[test]
    fn test_ordered_views() {
        let catalog = sample();

        let names = |order| -> Vec<String> {
            catalog
                .ordered(order)
                .into_iter()
                .map(|(name, _)| name.to_string())
                .collect()
        };

        assert_eq!(
            names(CatalogOrder::Alphabetical),
            vec!["agent", "items", "name", "vip"]
        );
        assert_eq!(
            names(CatalogOrder::FirstSeen),
            vec!["name", "items", "vip", "agent"]
        );
        assert_eq!(names(CatalogOrder::Form), vec!["agent", "name", "items", "vip"]);
    }

    #[test]
    fn test_ordered_serialization() {
        let json = serde_json::to_string(&sample().view(CatalogOrder::FirstSeen)).unwrap();
        assert_eq!(
            json,
            r#"{"name":{"type":"simple"},"items":{"type":"array","fields":["price","title"]},"vip":{"type":"boolean"},"agent":{"type":"simple"}}"#
        );
    }

    #[test]
    fn test_rename_table_last_write_wins() {
        let mut table = RenameTable::new();
        table.insert("Full Name", "Full_Name");
        table.insert("Name", "Name");

        let mut other = RenameTable::new();
        other.insert("Full Name", "Full_Name");
        other.insert("дата договора", "дата_договора");
        table.merge(other);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("дата договора"), Some("дата_договора"));
        let changed: Vec<_> = table.changed().collect();
        assert_eq!(
            changed,
            vec![("Full Name", "Full_Name"), ("дата договора", "дата_договора")]
        );
    }

    #[test]
    fn test_payload_template() {
        let mut table = RenameTable::new();
        table.insert("Full Name", "Full_Name");
        let template = table.payload_template();
        assert_eq!(template.get("Full_Name").map(String::as_str), Some("<Full Name>"));
    }
}
