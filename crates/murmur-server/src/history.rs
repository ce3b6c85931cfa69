//! Context-window assembly from the message log.
//!
//! The store returns the most-recent messages newest first; generators expect
//! a chronological (oldest first) window. This module owns that mapping and
//! the kind→role translation, so the truncation semantics live in one place.

use murmur_core::ids::SessionId;
use murmur_core::messages::{MessageKind, MessageRecord};
use murmur_llm::types::ChatMessage;
use murmur_store::errors::StoreError;
use murmur_store::store::ConversationStore;

/// Map a newest-first message slice to a chronological generator window.
///
/// Both user kinds (`user_text`, `user_audio`) map to the `user` role; the
/// generator never sees the audio/text distinction.
pub fn to_chat_history(newest_first: &[MessageRecord]) -> Vec<ChatMessage> {
    newest_first
        .iter()
        .rev()
        .map(|m| match m.kind {
            MessageKind::UserText | MessageKind::UserAudio => ChatMessage::user(&m.content),
            MessageKind::AiResponse => ChatMessage::assistant(&m.content),
        })
        .collect()
}

/// Fetch the most-recent `limit` messages and return them as a chronological
/// generator window.
pub async fn context_window(
    store: &ConversationStore,
    session_id: &SessionId,
    limit: usize,
) -> Result<Vec<ChatMessage>, StoreError> {
    let recent = store.recent_messages(session_id.clone(), limit).await?;
    Ok(to_chat_history(&recent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_llm::types::Role;

    fn record(id: i64, content: &str, kind: MessageKind) -> MessageRecord {
        MessageRecord {
            id,
            session_id: "sess_a".into(),
            content: content.into(),
            kind,
            timestamp: format!("2026-01-01T00:00:0{id}+00:00"),
            audio_duration: None,
        }
    }

    #[test]
    fn reverses_to_chronological_order() {
        // Store order: newest first
        let rows = vec![
            record(3, "third", MessageKind::AiResponse),
            record(2, "second", MessageKind::UserText),
            record(1, "first", MessageKind::UserText),
        ];
        let window = to_chat_history(&rows);
        assert_eq!(window[0].content, "first");
        assert_eq!(window[1].content, "second");
        assert_eq!(window[2].content, "third");
    }

    #[test]
    fn both_user_kinds_map_to_user_role() {
        let rows = vec![
            record(2, "spoken", MessageKind::UserAudio),
            record(1, "typed", MessageKind::UserText),
        ];
        let window = to_chat_history(&rows);
        assert!(window.iter().all(|m| m.role == Role::User));
    }

    #[test]
    fn ai_kind_maps_to_assistant_role() {
        let window = to_chat_history(&[record(1, "reply", MessageKind::AiResponse)]);
        assert_eq!(window[0].role, Role::Assistant);
    }

    #[test]
    fn empty_log_yields_empty_window() {
        assert!(to_chat_history(&[]).is_empty());
    }

    #[tokio::test]
    async fn context_window_honors_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path().join("t.db")).unwrap();
        let session = store.create_session(None).await.unwrap();
        let id = SessionId::new(session.session_id);
        for i in 0..5 {
            let _ = store
                .append_message(id.clone(), format!("m{i}"), MessageKind::UserText, None)
                .await
                .unwrap();
        }

        let window = context_window(&store, &id, 3).await.unwrap();
        assert_eq!(window.len(), 3);
        // Oldest of the three retained, in chronological order
        assert_eq!(window[0].content, "m2");
        assert_eq!(window[2].content, "m4");
    }

    #[tokio::test]
    async fn context_window_of_unknown_session_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path().join("t.db")).unwrap();
        let window = context_window(&store, &SessionId::new("ghost"), 10)
            .await
            .unwrap();
        assert!(window.is_empty());
    }
}
