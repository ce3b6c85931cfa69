//! High-level `ConversationStore` API.
//!
//! Wraps the connection pool and the stateless repositories behind async
//! methods. Every call checks out a pooled connection on a blocking thread
//! (`spawn_blocking`) so slow disk I/O never stalls the async runtime that
//! drives the per-connection socket loops.

use std::path::Path;

use murmur_core::ids::SessionId;
use murmur_core::messages::{MessageKind, MessageRecord, SessionRecord};
use rusqlite::Connection;
use tracing::debug;

use crate::errors::{Result, StoreError};
use crate::pool::{ConnectionPool, open_pool};
use crate::repositories::message::{AppendMessageOptions, MessageRepo};
use crate::repositories::session::SessionRepo;

/// Pooled, async-friendly facade over the message log.
///
/// Cheap to clone — the pool is reference counted.
#[derive(Clone)]
pub struct ConversationStore {
    pool: ConnectionPool,
}

impl ConversationStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            pool: open_pool(path)?,
        })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Run `f` with a pooled connection on a blocking thread.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Internal(format!("blocking task join: {e}")))?
    }

    /// Create a session with a freshly generated id.
    pub async fn create_session(&self, title: Option<String>) -> Result<SessionRecord> {
        let session_id = SessionId::generate();
        self.with_conn(move |conn| SessionRepo::create(conn, &session_id, title.as_deref()))
            .await
    }

    /// Get an existing session, or create it with an implicit title.
    ///
    /// The single resolve-or-create entry point shared by every surface
    /// (HTTP routes and the socket dispatch) — session auto-creation is not
    /// duplicated anywhere else.
    pub async fn resolve_or_create(&self, session_id: SessionId) -> Result<SessionRecord> {
        self.with_conn(move |conn| {
            let record = SessionRepo::get_or_create(conn, &session_id)?;
            debug!(session_id = %session_id, "session resolved");
            Ok(record)
        })
        .await
    }

    /// Get a session by id.
    pub async fn get_session(&self, session_id: SessionId) -> Result<Option<SessionRecord>> {
        self.with_conn(move |conn| SessionRepo::get_by_id(conn, &session_id))
            .await
    }

    /// All sessions, most recently updated first.
    pub async fn list_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.with_conn(|conn| SessionRepo::list(conn)).await
    }

    /// Append a message and bump the session's `updated_at`, atomically.
    ///
    /// Fails with [`StoreError::SessionNotFound`] when the session is absent.
    pub async fn append_message(
        &self,
        session_id: SessionId,
        content: String,
        kind: MessageKind,
        audio_duration: Option<f64>,
    ) -> Result<MessageRecord> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            if SessionRepo::get_by_id(&tx, &session_id)?.is_none() {
                return Err(StoreError::SessionNotFound(session_id.to_string()));
            }
            let message = MessageRepo::append(
                &tx,
                &AppendMessageOptions {
                    session_id: &session_id,
                    content: &content,
                    kind,
                    audio_duration,
                },
            )?;
            SessionRepo::touch(&tx, &session_id)?;
            tx.commit()?;
            Ok(message)
        })
        .await
    }

    /// Up to `limit` most-recent messages, newest first.
    pub async fn recent_messages(
        &self,
        session_id: SessionId,
        limit: usize,
    ) -> Result<Vec<MessageRecord>> {
        self.with_conn(move |conn| MessageRepo::recent(conn, &session_id, limit))
            .await
    }

    /// All messages in chronological order.
    pub async fn list_messages(&self, session_id: SessionId) -> Result<Vec<MessageRecord>> {
        self.with_conn(move |conn| MessageRepo::list_chronological(conn, &session_id))
            .await
    }

    /// Number of messages in a session.
    pub async fn count_messages(&self, session_id: SessionId) -> Result<u64> {
        self.with_conn(move |conn| MessageRepo::count(conn, &session_id))
            .await
    }

    /// Mark a session active or inactive.
    pub async fn set_active(&self, session_id: SessionId, active: bool) -> Result<()> {
        self.with_conn(move |conn| SessionRepo::set_active(conn, &session_id, active))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, ConversationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ConversationStore::open(dir.path().join("murmur.db")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn create_session_generates_id() {
        let (_dir, store) = open_store();
        let session = store.create_session(Some("Hello".into())).await.unwrap();
        assert!(session.session_id.starts_with("sess_"));
        assert_eq!(session.title, "Hello");
    }

    #[tokio::test]
    async fn resolve_or_create_round_trip() {
        let (_dir, store) = open_store();
        let id = SessionId::new("caller-chosen-id");
        let first = store.resolve_or_create(id.clone()).await.unwrap();
        assert_eq!(first.title, "Session caller-c");
        let second = store.resolve_or_create(id).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn append_to_missing_session_fails() {
        let (_dir, store) = open_store();
        let err = store
            .append_message(
                SessionId::new("ghost"),
                "hi".into(),
                MessageKind::UserText,
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn append_touches_session() {
        let (_dir, store) = open_store();
        let session = store.create_session(None).await.unwrap();
        let id = SessionId::new(session.session_id.clone());
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let _ = store
            .append_message(id.clone(), "hi".into(), MessageKind::UserText, None)
            .await
            .unwrap();
        let after = store.get_session(id).await.unwrap().unwrap();
        assert!(after.updated_at > session.updated_at);
    }

    #[tokio::test]
    async fn recent_and_chronological_agree() {
        let (_dir, store) = open_store();
        let session = store.create_session(None).await.unwrap();
        let id = SessionId::new(session.session_id);
        for i in 0..4 {
            let _ = store
                .append_message(id.clone(), format!("m{i}"), MessageKind::UserText, None)
                .await
                .unwrap();
        }
        let recent = store.recent_messages(id.clone(), 2).await.unwrap();
        assert_eq!(recent[0].content, "m3");
        assert_eq!(recent[1].content, "m2");

        let all = store.list_messages(id.clone()).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].content, "m0");
        assert_eq!(store.count_messages(id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn list_sessions_most_recent_first() {
        let (_dir, store) = open_store();
        let first = store.create_session(Some("first".into())).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let _ = store.create_session(Some("second".into())).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        // Touch the first session so it becomes the most recently updated
        let _ = store
            .append_message(
                SessionId::new(first.session_id),
                "hi".into(),
                MessageKind::UserText,
                None,
            )
            .await
            .unwrap();

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].title, "first");
        assert_eq!(sessions[1].title, "second");
    }

    #[tokio::test]
    async fn set_active_round_trip() {
        let (_dir, store) = open_store();
        let session = store.create_session(None).await.unwrap();
        let id = SessionId::new(session.session_id);
        store.set_active(id.clone(), false).await.unwrap();
        assert!(!store.get_session(id).await.unwrap().unwrap().is_active);
    }

    #[tokio::test]
    async fn concurrent_appends_from_many_tasks() {
        let (_dir, store) = open_store();
        let session = store.create_session(None).await.unwrap();
        let id = SessionId::new(session.session_id);

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append_message(id, format!("c{i}"), MessageKind::UserText, None)
                    .await
            }));
        }
        for handle in handles {
            let _ = handle.await.unwrap().unwrap();
        }
        assert_eq!(store.count_messages(id).await.unwrap(), 8);
    }
}
