//! Error types for the backend client

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the extraction backend
#[derive(Debug, Error, PartialEq, Clone)]
pub enum BackendError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file error during upload preparation
    #[error("File error: {0}")]
    Io(String),

    /// Upload rejected before any bytes were sent
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Could not reach the backend
    #[error("Connection error: {0}")]
    Connect(String),

    /// Other transport-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Status {
        status: u16,
        /// User-facing message extracted from the response payload
        message: String,
        /// Full response payload, kept for diagnostics
        payload: Value,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BackendError {
    /// Build a status error from a response body.
    ///
    /// The user-facing message is extracted in priority order: the payload's
    /// `error` field, then its `message` field, then the serialized payload,
    /// then the raw body text.
    pub fn from_status(status: u16, body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(payload) => {
                let message = payload
                    .get("error")
                    .and_then(Value::as_str)
                    .or_else(|| payload.get("message").and_then(Value::as_str))
                    .map(str::to_string)
                    .unwrap_or_else(|| payload.to_string());
                BackendError::Status {
                    status,
                    message,
                    payload,
                }
            }
            Err(_) => BackendError::Status {
                status,
                message: body.to_string(),
                payload: Value::Null,
            },
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_connect() {
            BackendError::Connect(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_field_wins() {
        let err = BackendError::from_status(400, r#"{"error": "bad file", "message": "ignored"}"#);
        match err {
            BackendError::Status {
                status, message, ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad file");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn message_field_is_second_choice() {
        let err = BackendError::from_status(500, r#"{"message": "upstream down"}"#);
        match err {
            BackendError::Status { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serialized_payload_is_third_choice() {
        let err = BackendError::from_status(422, r#"{"detail": "unprocessable"}"#);
        match err {
            BackendError::Status { message, payload, .. } => {
                assert_eq!(message, r#"{"detail":"unprocessable"}"#);
                assert_eq!(payload, json!({"detail": "unprocessable"}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_body_falls_back_to_raw_text() {
        let err = BackendError::from_status(502, "Bad Gateway");
        match err {
            BackendError::Status {
                message, payload, ..
            } => {
                assert_eq!(message, "Bad Gateway");
                assert_eq!(payload, Value::Null);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
