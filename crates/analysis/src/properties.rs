use serde_json::{Map, Value};

/// Placeholder shown for attributes the source data never carried.
pub const MISSING_TEXT: &str = "N/A";

/// Reads a numeric property, or `None` when the key is absent or the value
/// is not a finite JSON number. Strings never coerce, so `"bad"` and `"12"`
/// both count as missing.
pub fn numeric_property(properties: &Map<String, Value>, key: &str) -> Option<f64> {
    properties
        .get(key)
        .and_then(|v| v.as_f64())
        .filter(|v| v.is_finite())
}

/// Reads a text property with the [`MISSING_TEXT`] fallback.
///
/// Non-empty strings pass through, numbers render in their decimal form,
/// and everything else (absent, `null`, empty string, booleans, structured
/// values) falls back to the sentinel.
pub fn text_property(properties: &Map<String, Value>, key: &str) -> String {
    match properties.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => MISSING_TEXT.to_string(),
    }
}
