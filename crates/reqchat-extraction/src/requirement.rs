//! Requirement record recovered from a backend payload

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One extracted need statement.
///
/// All fields default to the empty string, never to an absent value, so
/// rendering code never has to branch on missing data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Short label/name of the requirement
    pub title: String,
    /// Free-text elaboration
    pub description: String,
    /// Original, unnormalized type label as supplied by the backend
    pub raw_type: String,
}

impl Requirement {
    /// Map one decoded JSON element to a requirement.
    ///
    /// Field names vary between backend revisions, so each output field is
    /// filled from an ordered list of candidates, first present non-null
    /// value wins:
    /// - title: `exigence`, `requirement`, `title`, `description`
    /// - description: `description`
    /// - raw_type: `type`
    pub fn from_json(value: &Value) -> Self {
        Self {
            title: first_field(value, &["exigence", "requirement", "title", "description"]),
            description: first_field(value, &["description"]),
            raw_type: first_field(value, &["type"]),
        }
    }
}

/// Pick the first non-null candidate field and coerce it to a string.
fn first_field(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(field_string)
        .unwrap_or_default()
}

/// String form of a field value. Nulls count as absent; non-string scalars
/// are kept in their JSON rendering rather than dropped.
fn field_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
