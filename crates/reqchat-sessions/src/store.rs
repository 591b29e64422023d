//! In-memory conversation store

use crate::models::{ChatMessage, MessageDraft};

/// Conversation state for the lifetime of the process.
///
/// Holds the ordered message list, the in-flight request flag, and the
/// one-shot guard that keeps the backend history from being fetched more
/// than once per conversation.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
    loading: bool,
    history_fetched: bool,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in insertion order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Normalize a draft and append it. Returns the stored message.
    pub fn add_message(&mut self, draft: MessageDraft) -> &ChatMessage {
        self.messages.push(draft.normalize());
        let index = self.messages.len() - 1;
        &self.messages[index]
    }

    /// Drop all messages and re-arm the history guard
    pub fn clear(&mut self) {
        self.messages.clear();
        self.history_fetched = false;
    }

    /// Whether a backend request is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// One-shot history barrier: `true` exactly once, until [`clear`]
    /// re-arms it.
    ///
    /// [`clear`]: ConversationStore::clear
    pub fn begin_history_fetch(&mut self) -> bool {
        if self.history_fetched {
            return false;
        }
        self.history_fetched = true;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    #[test]
    fn messages_keep_insertion_order() {
        let mut store = ConversationStore::new();
        store.add_message(MessageDraft::user("first"));
        store.add_message(MessageDraft::assistant("second"));
        store.add_message(MessageDraft::user("third"));

        let contents: Vec<_> = store.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn add_message_normalizes_drafts() {
        let mut store = ConversationStore::new();
        let stored = store.add_message(MessageDraft::default());
        assert_eq!(stored.role, MessageRole::Assistant);
        assert_eq!(stored.content, "");
        assert!(!stored.id.is_empty());
    }

    #[test]
    fn clear_empties_the_conversation() {
        let mut store = ConversationStore::new();
        store.add_message(MessageDraft::user("hello"));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn loading_flag_round_trips() {
        let mut store = ConversationStore::new();
        assert!(!store.is_loading());
        store.set_loading(true);
        assert!(store.is_loading());
        store.set_loading(false);
        assert!(!store.is_loading());
    }

    #[test]
    fn history_guard_fires_exactly_once() {
        let mut store = ConversationStore::new();
        assert!(store.begin_history_fetch());
        assert!(!store.begin_history_fetch());
        assert!(!store.begin_history_fetch());
    }

    #[test]
    fn clear_rearms_the_history_guard() {
        let mut store = ConversationStore::new();
        assert!(store.begin_history_fetch());
        store.clear();
        assert!(store.begin_history_fetch());
        assert!(!store.begin_history_fetch());
    }
}
