//! Data models for conversation messages

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message in the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier for the message
    pub id: String,
    /// Role of the message sender
    pub role: MessageRole,
    /// Message content
    pub content: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    /// URL of an uploaded document this message refers to
    pub file_url: Option<String>,
    /// Model that produced or received the message
    pub model_id: Option<String>,
    /// Backend-side identifier, when the message was replayed from history
    pub uid: Option<String>,
}

impl ChatMessage {
    /// Create a new message with a fresh id and the current timestamp
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            file_url: None,
            model_id: None,
            uid: None,
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// User message
    User,
    /// Assistant message
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message as handed to the store, with every field optional.
///
/// Backend history entries and locally composed messages both arrive with
/// holes in them; the store fills the holes on insert so consumers only
/// ever see complete [`ChatMessage`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageDraft {
    pub id: Option<String>,
    pub role: Option<MessageRole>,
    pub content: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub file_url: Option<String>,
    pub model_id: Option<String>,
    pub uid: Option<String>,
}

impl MessageDraft {
    /// Draft for a locally composed user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Some(MessageRole::User),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Draft for an assistant reply
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Some(MessageRole::Assistant),
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Fill missing fields with defaults: fresh uuid, `Assistant` role,
    /// empty content, current time.
    pub fn normalize(self) -> ChatMessage {
        ChatMessage {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            role: self.role.unwrap_or(MessageRole::Assistant),
            content: self.content.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            file_url: self.file_url,
            model_id: self.model_id,
            uid: self.uid,
        }
    }
}
