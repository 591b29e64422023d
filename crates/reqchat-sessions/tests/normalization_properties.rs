//! Property tests for draft normalization and store invariants

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use reqchat_sessions::{ConversationStore, MessageDraft, MessageRole};

fn role_strategy() -> impl Strategy<Value = Option<MessageRole>> {
    prop_oneof![
        Just(None),
        Just(Some(MessageRole::User)),
        Just(Some(MessageRole::Assistant)),
    ]
}

proptest! {
    /// Normalization never leaves a hole: every field of the stored message
    /// has a value, whatever subset the draft supplied.
    #[test]
    fn normalize_fills_every_missing_field(
        id in proptest::option::of("[a-z0-9-]{1,36}"),
        role in role_strategy(),
        content in proptest::option::of(".{0,40}"),
        ts_secs in proptest::option::of(0i64..4_000_000_000),
        file_url in proptest::option::of("/files/[a-z]{1,10}"),
    ) {
        let draft = MessageDraft {
            id: id.clone(),
            role,
            content: content.clone(),
            timestamp: ts_secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            file_url: file_url.clone(),
            model_id: None,
            uid: None,
        };
        let message = draft.normalize();

        prop_assert!(!message.id.is_empty());
        if let Some(id) = id {
            prop_assert_eq!(&message.id, &id);
        }
        prop_assert_eq!(message.role, role.unwrap_or(MessageRole::Assistant));
        prop_assert_eq!(&message.content, &content.unwrap_or_default());
        if let Some(secs) = ts_secs {
            prop_assert_eq!(message.timestamp.timestamp(), secs);
        }
        // Optional metadata passes through untouched
        prop_assert_eq!(&message.file_url, &file_url);
    }

    /// Missing ids normalize to distinct fresh ids, never collide.
    #[test]
    fn fresh_ids_are_unique(count in 1usize..20) {
        let mut store = ConversationStore::new();
        for _ in 0..count {
            store.add_message(MessageDraft::default());
        }
        let mut ids: Vec<_> = store.messages().iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), count);
    }

    /// The store keeps every inserted message, in insertion order.
    #[test]
    fn store_preserves_count_and_order(contents in proptest::collection::vec(".{0,20}", 0..20)) {
        let mut store = ConversationStore::new();
        for content in &contents {
            store.add_message(MessageDraft::user(content.clone()));
        }
        prop_assert_eq!(store.len(), contents.len());
        for (message, content) in store.messages().iter().zip(&contents) {
            prop_assert_eq!(&message.content, content);
        }
    }
}
