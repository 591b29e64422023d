//! Recovery of requirement lists from backend payloads
//!
//! The backend is free to answer with a native JSON array, a string holding
//! JSON, or prose with a JSON array buried somewhere inside it. Each entry
//! point walks a fallback chain and returns `None` when no recoverable
//! structure exists, leaving the caller to show the raw text instead.

use serde_json::Value;

use crate::requirement::Requirement;

/// Parse a JSON payload into requirements.
///
/// Fallback chain, first success wins:
/// 1. `null` parses to `None`;
/// 2. an array maps element-wise (an empty array is `Some(vec![])`, which is
///    deliberately distinct from `None`);
/// 3. a string goes through [`parse`].
///
/// Any other shape parses to `None`. This function never fails.
pub fn parse_value(value: &Value) -> Option<Vec<Requirement>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(map_items(items)),
        Value::String(text) => parse(text),
        _ => None,
    }
}

/// Parse a text payload into requirements.
///
/// Fallback chain, first success wins:
/// 1. empty or whitespace-only text parses to `None`;
/// 2. the whole string decodes as a JSON array;
/// 3. the substring between the first `[` and the last `]` decodes as a
///    JSON array;
/// 4. otherwise `None`.
///
/// Decode failures are swallowed, never surfaced. This function never fails.
pub fn parse(text: &str) -> Option<Vec<Requirement>> {
    if text.trim().is_empty() {
        return None;
    }
    if let Some(items) = decode_array(text) {
        return Some(map_items(&items));
    }
    if let Some(slice) = embedded_array_slice(text) {
        if let Some(items) = decode_array(slice) {
            return Some(map_items(&items));
        }
    }
    None
}

fn map_items(items: &[Value]) -> Vec<Requirement> {
    items.iter().map(Requirement::from_json).collect()
}

/// Decode `text` as JSON and keep it only if it is an array.
fn decode_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

/// The widest bracketed slice of `text`: first `[` through last `]`.
fn embedded_array_slice(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
