//! Example payloads and payload validation.
//!
//! A payload is the JSON object whose keys are the catalog's root variables.
//! [`skeleton`] builds one with placeholder values for a form or a fixture;
//! [`validate`] checks a filled-in payload against the catalog before it is
//! handed to the renderer.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use stencil_relief::{Catalog, CatalogOrder, VariableKind};

/// Build an example payload for a catalog.
///
/// ```
/// use stencil_croquis::{classify, skeleton};
///
/// let catalog = classify(&stencil_armature::scan("{{ a.b.c }} {% if ok %}{% endif %}"));
/// assert_eq!(skeleton(&catalog).to_string(), r#"{"a":{"b":{"c":""}},"ok":false}"#);
/// ```
pub fn skeleton(catalog: &Catalog) -> Value {
    let payload = catalog
        .ordered(CatalogOrder::Alphabetical)
        .into_iter()
        .map(|(name, entry)| (name.to_string(), skeleton_value(&entry.kind)))
        .collect();
    Value::Object(payload)
}

fn skeleton_value(kind: &VariableKind) -> Value {
    match kind {
        VariableKind::Simple => Value::String(String::new()),
        VariableKind::Boolean => Value::Bool(false),
        VariableKind::Array { fields } if fields.is_empty() => Value::Array(Vec::new()),
        VariableKind::Array { fields } => {
            let item = fields
                .iter()
                .map(|field| (field.to_string(), Value::String(String::new())))
                .collect();
            Value::Array(vec![Value::Object(item)])
        }
        VariableKind::Object { fields } => {
            let mut object = Map::new();
            for field in fields {
                let segments: Vec<&str> = field.split('.').collect();
                insert_path(&mut object, &segments);
            }
            Value::Object(object)
        }
    }
}

/// A path that is both a leaf and a prefix of another path becomes an object.
fn insert_path(object: &mut Map<String, Value>, segments: &[&str]) {
    match segments {
        [] => {}
        [leaf] => {
            object
                .entry(leaf.to_string())
                .or_insert_with(|| Value::String(String::new()));
        }
        [head, rest @ ..] => {
            let slot = object
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(inner) = slot {
                insert_path(inner, rest);
            }
        }
    }
}

/// What is wrong at a payload path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "kebab-case")]
pub enum IssueKind {
    /// A catalog variable or declared field has no value
    Missing,
    /// A top-level key the template never reads
    Unexpected,
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// One finding of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadIssue {
    /// `name`, `name.field.path` or `name[index].field`; empty for the payload itself
    pub path: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl PayloadIssue {
    fn missing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: IssueKind::Missing,
        }
    }

    fn unexpected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: IssueKind::Unexpected,
        }
    }

    fn mismatch(path: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self {
            path: path.into(),
            kind: IssueKind::TypeMismatch {
                expected,
                found: type_name(found),
            },
        }
    }
}

impl fmt::Display for PayloadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "payload"
        } else {
            &self.path
        };
        match &self.kind {
            IssueKind::Missing => write!(f, "{path}: missing"),
            IssueKind::Unexpected => write!(f, "{path}: not used by the template"),
            IssueKind::TypeMismatch { expected, found } => {
                write!(f, "{path}: expected {expected}, found {found}")
            }
        }
    }
}

/// Check a payload against a catalog.
///
/// Simple variables accept any value. Issues come in catalog order, followed
/// by unexpected keys in payload order.
pub fn validate(catalog: &Catalog, payload: &Value) -> Vec<PayloadIssue> {
    let mut issues = Vec::new();
    let Some(object) = payload.as_object() else {
        issues.push(PayloadIssue::mismatch("", "object", payload));
        return issues;
    };

    for (name, entry) in catalog.ordered(CatalogOrder::Alphabetical) {
        match object.get(name) {
            Some(value) => check_value(name, &entry.kind, value, &mut issues),
            None => issues.push(PayloadIssue::missing(name)),
        }
    }

    issues.extend(
        object
            .keys()
            .filter(|key| !catalog.contains(key))
            .map(PayloadIssue::unexpected),
    );
    issues
}

fn check_value(path: &str, kind: &VariableKind, value: &Value, issues: &mut Vec<PayloadIssue>) {
    match kind {
        VariableKind::Simple => {}
        VariableKind::Boolean => {
            if !value.is_boolean() {
                issues.push(PayloadIssue::mismatch(path, "boolean", value));
            }
        }
        VariableKind::Array { fields } => {
            let Some(items) = value.as_array() else {
                issues.push(PayloadIssue::mismatch(path, "array", value));
                return;
            };
            if fields.is_empty() {
                return;
            }
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{index}]");
                let Some(item_object) = item.as_object() else {
                    issues.push(PayloadIssue::mismatch(item_path, "object", item));
                    continue;
                };
                for field in fields {
                    if !item_object.contains_key(field.as_str()) {
                        issues.push(PayloadIssue::missing(format!("{item_path}.{field}")));
                    }
                }
            }
        }
        VariableKind::Object { fields } => {
            let Some(object) = value.as_object() else {
                issues.push(PayloadIssue::mismatch(path, "object", value));
                return;
            };
            for field in fields {
                if lookup_path(object, field).is_none() {
                    issues.push(PayloadIssue::missing(format!("{path}.{field}")));
                }
            }
        }
    }
}

fn lookup_path<'v>(object: &'v Map<String, Value>, path: &str) -> Option<&'v Value> {
    let mut segments = path.split('.');
    let mut current = object.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;
    use serde_json::json;
    use stencil_armature::scan;

    const TEMPLATE: &str = "Hello {{name}}. {% for item in items %}{{item.title}}{% endfor %} \
                            {% if vip %}VIP{% endif %} {{ company.address.city }}";

    fn catalog() -> Catalog {
        classify(&scan(TEMPLATE))
    }

    #[test]
    fn test_skeleton() {
        assert_eq!(
            skeleton(&catalog()),
            json!({
                "company": { "address": { "city": "" } },
                "items": [ { "title": "" } ],
                "name": "",
                "vip": false
            })
        );
    }

    #[test]
    fn test_skeleton_empty_array_and_prefix_paths() {
        let catalog = classify(&scan(
            "{% for r in rows %}{% endfor %} {{ a.b }} {{ a.b.c }}",
        ));
        assert_eq!(
            skeleton(&catalog),
            json!({ "a": { "b": { "c": "" } }, "rows": [] })
        );
    }

    #[test]
    fn test_skeleton_validates_clean() {
        let catalog = catalog();
        assert!(validate(&catalog, &skeleton(&catalog)).is_empty());
    }

    #[test]
    fn test_validate_reports_everything() {
        let payload = json!({
            "name": 42,
            "vip": "yes",
            "items": [ { "title": "a" }, { "price": 1 }, "oops" ],
            "company": { "address": {} },
            "extra": true
        });
        let issues: Vec<String> = validate(&catalog(), &payload)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            issues,
            vec![
                "company.address.city: missing",
                "items[1].title: missing",
                "items[2]: expected object, found string",
                "vip: expected boolean, found string",
                "extra: not used by the template",
            ]
        );
    }

    #[test]
    fn test_validate_missing_and_wrong_container() {
        let payload = json!({ "items": {}, "company": [] });
        let issues = validate(&catalog(), &payload);
        assert_eq!(issues.len(), 4);
        assert_eq!(
            issues[0].kind,
            IssueKind::TypeMismatch {
                expected: "object",
                found: "array"
            }
        );
        assert_eq!(issues[1].path, "items");
        assert_eq!(issues[2], PayloadIssue::missing("name"));
        assert_eq!(issues[3], PayloadIssue::missing("vip"));
    }

    #[test]
    fn test_validate_non_object_payload() {
        let issues = validate(&catalog(), &json!([1, 2]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].to_string(), "payload: expected object, found array");
    }

    #[test]
    fn test_issue_serialization() {
        let issue = PayloadIssue::mismatch("vip", "boolean", &json!(null));
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({ "path": "vip", "issue": "type-mismatch", "expected": "boolean", "found": "null" })
        );
    }
}
