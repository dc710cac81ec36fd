// ============================================================
// Layer 3 — Generation Types
// ============================================================
// The values that cross the serving boundary.
//
//   GenerateRequest  → what an outer layer (CLI, HTTP adapter) asks for
//   GenerateResponse → the skeleton handed back
//   GenerateOptions  → decoding knobs (length cap and temperature)
//
// `style` and `slots` are accepted so request payloads from the
// serving layer deserialize cleanly, but generation ignores them.

use serde::{Deserialize, Serialize};

/// Default cap on decoding steps for one skeleton.
pub const DEFAULT_MAX_LENGTH: usize = 160;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Build the placeholder returned when a label was never seen in training.
pub fn no_template_for(label: &str) -> String {
    format!("[no template for label={label}]")
}

/// Request for one skeleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Category label to condition on
    pub label: String,

    /// Inert: accepted for payload compatibility, never read
    #[serde(default)]
    pub style: Option<serde_json::Value>,

    /// Inert: accepted for payload compatibility, never read
    #[serde(default)]
    pub slots: Option<serde_json::Value>,
}

impl GenerateRequest {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), style: None, slots: None }
    }
}

/// Response carrying the generated skeleton (or the no-template placeholder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub skeleton: String,
}

/// Decoding parameters for the sampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    /// Maximum number of decoding steps
    pub max_length: usize,

    /// Logits are divided by this before softmax.
    /// < 1.0 sharpens toward argmax, > 1.0 flattens toward uniform.
    pub temperature: f64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_length:  DEFAULT_MAX_LENGTH,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_names_the_label() {
        assert_eq!(no_template_for("unknown_label"), "[no template for label=unknown_label]");
    }

    #[test]
    fn test_request_accepts_inert_fields() {
        let json = r#"{"label":"greeting","style":{"tone":"warm"},"slots":{"name":"Ada"}}"#;
        let req: GenerateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.label, "greeting");
        assert!(req.style.is_some());

        // Missing optional fields default to None
        let bare: GenerateRequest = serde_json::from_str(r#"{"label":"farewell"}"#).unwrap();
        assert_eq!(bare, GenerateRequest::new("farewell"));
    }

    #[test]
    fn test_default_options() {
        let o = GenerateOptions::default();
        assert_eq!(o.max_length, 160);
        assert_eq!(o.temperature, 0.5);
    }
}
