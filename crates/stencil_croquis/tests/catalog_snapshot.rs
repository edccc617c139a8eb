//! Catalog snapshot tests.
//!
//! These render catalogs the way the CLI prints them and compare against
//! inline snapshots.

use stencil_armature::Scanner;
use stencil_croquis::{analyze_source, analyze_text, skeleton, AnalyzerOptions};
use stencil_relief::Document;

/// Helper to render the catalog of a template as pretty JSON
fn render(text: &str) -> String {
    let croquis = analyze_text(&Scanner::default(), &AnalyzerOptions::default(), text);
    serde_json::to_string_pretty(&croquis.catalog).unwrap()
}

// =============================================================================
// Classification
// =============================================================================

mod classification {
    use super::*;

    #[test]
    fn greeting_with_loop_and_condition() {
        insta::assert_snapshot!(render(
            "Hello {{name}}. {% for item in items %}{{item.title}}{% endfor %} {% if vip %}VIP{% endif %}"
        ), @r#"
        {
          "items": {
            "type": "array",
            "fields": [
              "title"
            ]
          },
          "name": {
            "type": "simple"
          },
          "vip": {
            "type": "boolean"
          }
        }
        "#);
    }

    #[test]
    fn nested_object_path() {
        insta::assert_snapshot!(render("{{company.address.city}}"), @r#"
        {
          "company": {
            "type": "object",
            "fields": [
              "address.city"
            ]
          }
        }
        "#);
    }

    #[test]
    fn bare_loop() {
        insta::assert_snapshot!(render("{% for row in rows %}-{% endfor %}"), @r#"
        {
          "rows": {
            "type": "array",
            "fields": []
          }
        }
        "#);
    }

    #[test]
    fn empty_document() {
        insta::assert_snapshot!(render("Nothing to fill in here."), @"{}");
    }
}

// =============================================================================
// Documents
// =============================================================================

mod documents {
    use super::*;

    const CONTRACT: &str = r#"{
        "paragraphs": [
            { "runs": [ { "text": "Договор № {{ contract_number }} " }, { "text": "от {{ дата_договора | date }}" } ] },
            { "runs": [ { "text": "{% if prepaid %}Предоплата {{ prepaid_sum }}{% endif %}" } ] }
        ],
        "tables": [
            { "rows": [ { "cells": [
                { "paragraphs": [ { "runs": [ { "text": "{% for t in travelers %}{{ loop.index }}" } ] } ] },
                { "paragraphs": [ { "runs": [ { "text": "{{ t.name }} {{ t.passport.number }}{% endfor %}" } ] } ] }
            ] } ] }
        ]
    }"#;

    #[test]
    fn contract_document() {
        let document = Document::from_json(CONTRACT).unwrap();
        let croquis =
            analyze_source(&Scanner::default(), &AnalyzerOptions::default(), &document).unwrap();
        insta::assert_snapshot!(serde_json::to_string_pretty(&croquis).unwrap(), @r#"
        {
          "catalog": {
            "contract_number": {
              "type": "simple"
            },
            "prepaid": {
              "type": "boolean"
            },
            "prepaid_sum": {
              "type": "simple"
            },
            "travelers": {
              "type": "array",
              "fields": [
                "name",
                "passport"
              ]
            },
            "дата_договора": {
              "type": "simple"
            }
          }
        }
        "#);
    }

    #[test]
    fn contract_skeleton() {
        let document = Document::from_json(CONTRACT).unwrap();
        let croquis =
            analyze_source(&Scanner::default(), &AnalyzerOptions::default(), &document).unwrap();
        insta::assert_snapshot!(
            serde_json::to_string_pretty(&skeleton(&croquis.catalog)).unwrap(),
            @r#"
        {
          "contract_number": "",
          "prepaid": false,
          "prepaid_sum": "",
          "travelers": [
            {
              "name": "",
              "passport": ""
            }
          ],
          "дата_договора": ""
        }
        "#
        );
    }
}
