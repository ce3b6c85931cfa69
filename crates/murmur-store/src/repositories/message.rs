//! Message repository — append-only log over the `messages` table.

use murmur_core::ids::SessionId;
use murmur_core::messages::{MessageKind, MessageRecord};
use murmur_core::time::now_rfc3339;
use rusqlite::{Connection, Row, params};

use crate::errors::{Result, StoreError};

/// Options for appending a message.
pub struct AppendMessageOptions<'a> {
    /// Owning session.
    pub session_id: &'a SessionId,
    /// Message text.
    pub content: &'a str,
    /// Kind tag.
    pub kind: MessageKind,
    /// Audio duration in seconds, for `user_audio` messages.
    pub audio_duration: Option<f64>,
}

/// Message repository — stateless, every method takes `&Connection`.
pub struct MessageRepo;

impl MessageRepo {
    /// Append a message. Messages are immutable once written.
    pub fn append(conn: &Connection, opts: &AppendMessageOptions<'_>) -> Result<MessageRecord> {
        let now = now_rfc3339();
        let _ = conn.execute(
            "INSERT INTO messages (session_id, content, kind, timestamp, audio_duration)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                opts.session_id.as_str(),
                opts.content,
                opts.kind.as_str(),
                now,
                opts.audio_duration
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(MessageRecord {
            id,
            session_id: opts.session_id.to_string(),
            content: opts.content.to_string(),
            kind: opts.kind,
            timestamp: now,
            audio_duration: opts.audio_duration,
        })
    }

    /// Up to `limit` most-recent messages for a session, newest first.
    ///
    /// The tie-break on row id keeps messages written within the same
    /// timestamp tick in insertion order.
    pub fn recent(
        conn: &Connection,
        session_id: &SessionId,
        limit: usize,
    ) -> Result<Vec<MessageRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, session_id, content, kind, timestamp, audio_duration
             FROM messages WHERE session_id = ?1
             ORDER BY timestamp DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![session_id.as_str(), limit as i64], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(decode_row).collect()
    }

    /// All messages for a session in chronological (oldest-first) order.
    pub fn list_chronological(
        conn: &Connection,
        session_id: &SessionId,
    ) -> Result<Vec<MessageRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, session_id, content, kind, timestamp, audio_duration
             FROM messages WHERE session_id = ?1
             ORDER BY timestamp ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![session_id.as_str()], map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(decode_row).collect()
    }

    /// Number of messages in a session.
    pub fn count(conn: &Connection, session_id: &SessionId) -> Result<u64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE session_id = ?1",
            params![session_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

/// Raw row before the kind tag is validated.
struct RawMessageRow {
    id: i64,
    session_id: String,
    content: String,
    kind: String,
    timestamp: String,
    audio_duration: Option<f64>,
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<RawMessageRow> {
    Ok(RawMessageRow {
        id: row.get(0)?,
        session_id: row.get(1)?,
        content: row.get(2)?,
        kind: row.get(3)?,
        timestamp: row.get(4)?,
        audio_duration: row.get(5)?,
    })
}

fn decode_row(raw: RawMessageRow) -> Result<MessageRecord> {
    let kind = MessageKind::parse(&raw.kind)
        .ok_or_else(|| StoreError::CorruptRow(format!("unknown message kind: {}", raw.kind)))?;
    Ok(MessageRecord {
        id: raw.id,
        session_id: raw.session_id,
        content: raw.content,
        kind,
        timestamp: raw.timestamp,
        audio_duration: raw.audio_duration,
    })
}
