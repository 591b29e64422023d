//! In-memory conversation state for ReqChat
//!
//! A single conversation lives in process memory: an ordered message list
//! with normalization defaults applied on insert, a loading flag for
//! in-flight requests, and a one-shot guard around the initial history
//! fetch. Nothing here touches the disk or the network.

pub mod models;
pub mod store;

pub use models::{ChatMessage, MessageDraft, MessageRole};
pub use store::ConversationStore;
