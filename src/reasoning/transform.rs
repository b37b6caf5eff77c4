//! Transformation response parsing
//!
//! The model is asked for a bare JSON object. Two tiers recover from the
//! usual deviations: `clean_json` strips fences and surrounding prose, and if
//! that still doesn't parse, `extract_json` takes the raw text from the first
//! `{` to the last `}`.

use log::warn;
use serde_json::Value;

use crate::error::{RelayError, Result};

/// Strip code fences and any text outside the outermost braces
pub fn clean_json(input: &str) -> String {
    let cleaned = input.trim().replace("```json", "").replace("```", "");

    let cleaned = match cleaned.find('{') {
        Some(start) => &cleaned[start..],
        None => cleaned.as_str(),
    };
    let cleaned = match cleaned.rfind('}') {
        Some(end) => &cleaned[..=end],
        None => cleaned,
    };

    cleaned.trim().to_string()
}

/// Substring from the first `{` to the last `}` inclusive, if both exist in order
pub fn extract_json(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let end = input.rfind('}')?;
    (end > start).then(|| &input[start..=end])
}

/// Parse a transformation response into a JSON object
pub fn parse_transformation(response: &str) -> Result<Value> {
    let cleaned = clean_json(response);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => require_object(value),
        Err(e) => {
            warn!("Cleaned transformation response did not parse ({}), trying raw extraction", e);
            let extracted = extract_json(response).ok_or_else(|| {
                RelayError::Transformation(format!("No JSON object in response: {}", truncate_for_error(response, 100)))
            })?;
            let value = serde_json::from_str::<Value>(extracted)
                .map_err(|e| RelayError::Transformation(format!("Extracted JSON did not parse: {}", e)))?;
            require_object(value)
        }
    }
}

fn require_object(value: Value) -> Result<Value> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(RelayError::Transformation(format!(
            "Expected a JSON object, got: {}",
            truncate_for_error(&value.to_string(), 100)
        )))
    }
}

/// Truncate text for error messages
fn truncate_for_error(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
