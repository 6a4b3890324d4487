//! Value coercions for profile settings
//!
//! Profiles are hand edited, so the same setting shows up as a JSON bool in
//! one profile and as the string "True" in the next. These helpers turn a
//! raw [`JsonValue`] into the shape a builder wants without ever failing
//! hard: callers decide what a missing or malformed value means.

use std::str::FromStr;

use serde_json::Value as JsonValue;

/// Render a scalar as text. Strings are trimmed and blank strings count as absent.
pub fn as_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `true`, or one of the strings "true" / "True" / "TRUE". Everything else is false.
pub fn as_bool(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => matches!(s.trim(), "true" | "True" | "TRUE"),
        _ => false,
    }
}

/// Comma-separated string or array of scalars, trimmed, blanks dropped
pub fn as_list(value: &JsonValue) -> Vec<String> {
    match value {
        JsonValue::String(s) => split_list(s),
        JsonValue::Array(items) => items
            .iter()
            .filter_map(as_text)
            .flat_map(|item| split_list(&item))
            .collect(),
        other => as_text(other).into_iter().collect(),
    }
}

/// Number, or a string that parses as one
pub fn as_number<T: FromStr>(value: &JsonValue) -> Option<T> {
    match value {
        JsonValue::Number(n) => n.to_string().parse().ok(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Split on commas, trim each entry and drop blanks
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a float the way profile authors write them ("1.0", not "1")
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
