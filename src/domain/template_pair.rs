// ============================================================
// Layer 3 — TemplatePair Domain Type
// ============================================================
// One record of the template corpus: a category label and the
// skeleton text written for it.
//
// Example corpus line:
//   greeting|Hello [name], welcome back!
// becomes
//   TemplatePair { label: "greeting", text: "Hello [name], welcome back!" }
//
// Pairs are created once by the corpus loader and never mutated.
// Duplicates are kept: two identical lines are two training samples.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// A `(label, text)` pair loaded from the template corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePair {
    /// Discrete category the text belongs to (e.g. "greeting")
    pub label: String,

    /// The skeleton text, without the `<` / `>` sentinels
    pub text: String,
}

impl TemplatePair {
    /// Create a new pair. Accepts anything convertible into String
    /// so callers can pass &str or String.
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text:  text.into(),
        }
    }
}
