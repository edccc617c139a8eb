//! Reserved template-engine names.
//!
//! Names whose root is in this set belong to the templating engine rather than
//! to the data payload, so the classifier never turns them into variables.
//! Uses a compile-time perfect hash set; configuration can add more names
//! through [`crate::AnalyzerOptions::reserved`].

use phf::phf_set;

/// Engine-provided names visible inside templates.
/// `loop` is the per-iteration metadata accessor (`loop.index`, `loop.first`).
static RESERVED_NAMES_SET: phf::Set<&'static str> = phf_set! {
    "loop",
};

/// Check if a root name is provided by the templating engine.
#[inline]
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES_SET.contains(name)
}
