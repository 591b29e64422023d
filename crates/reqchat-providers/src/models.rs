//! Request and response types for the extraction backend API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body for `POST /v1/chat`
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    /// User message text
    pub message: String,
    /// Model that should answer
    pub model_id: String,
}

/// Response from `POST /v1/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    /// Assistant reply text
    pub reply: String,
    /// Model that produced the reply, echoed back by the backend
    #[serde(default)]
    pub model_id: Option<String>,
}

/// Response from `GET /chat/models`
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub available_models: Vec<String>,
}

/// One entry of `GET /chat/history`.
///
/// The backend leaves fields out freely, so everything is optional here;
/// normalization happens when the entry becomes a stored message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    /// Backend-side id, numeric or string depending on the backend version
    #[serde(default)]
    pub uid: Option<Value>,
    #[serde(default)]
    pub role: Option<String>,
}

impl HistoryEntry {
    /// Backend id as a string, regardless of its JSON type
    pub fn uid_string(&self) -> Option<String> {
        match self.uid.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Result of `POST /chat/extract_requirements`
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    /// Raw response payload, whatever shape the backend produced
    pub payload: Value,
}

impl UploadOutcome {
    /// Best-effort reply text for the conversation: the payload's `reply`
    /// field, or the whole payload when it is a bare string.
    pub fn candidate_reply(&self) -> Option<String> {
        match &self.payload {
            Value::String(text) => Some(text.clone()),
            other => other
                .get("reply")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }
}
