//! Session repository — CRUD for the `conversations` table.

use murmur_core::constants::DEFAULT_SESSION_TITLE;
use murmur_core::ids::SessionId;
use murmur_core::messages::SessionRecord;
use murmur_core::time::now_rfc3339;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;

/// Session repository — stateless, every method takes `&Connection`.
pub struct SessionRepo;

impl SessionRepo {
    /// Create a new session with the given id.
    pub fn create(
        conn: &Connection,
        session_id: &SessionId,
        title: Option<&str>,
    ) -> Result<SessionRecord> {
        let now = now_rfc3339();
        let title = title.unwrap_or(DEFAULT_SESSION_TITLE);
        let _ = conn.execute(
            "INSERT INTO conversations (session_id, title, created_at, updated_at, is_active)
             VALUES (?1, ?2, ?3, ?4, 1)",
            params![session_id.as_str(), title, now, now],
        )?;
        Ok(SessionRecord {
            session_id: session_id.to_string(),
            title: title.to_string(),
            created_at: now.clone(),
            updated_at: now,
            is_active: true,
        })
    }

    /// Get a session by id.
    pub fn get_by_id(conn: &Connection, session_id: &SessionId) -> Result<Option<SessionRecord>> {
        let row = conn
            .query_row(
                "SELECT session_id, title, created_at, updated_at, is_active
                 FROM conversations WHERE session_id = ?1",
                params![session_id.as_str()],
                |row| {
                    Ok(SessionRecord {
                        session_id: row.get(0)?,
                        title: row.get(1)?,
                        created_at: row.get(2)?,
                        updated_at: row.get(3)?,
                        is_active: row.get::<_, i64>(4)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Get an existing session, or create it with an implicit title derived
    /// from the id prefix.
    pub fn get_or_create(conn: &Connection, session_id: &SessionId) -> Result<SessionRecord> {
        if let Some(session) = Self::get_by_id(conn, session_id)? {
            return Ok(session);
        }
        let title = format!("Session {}", session_id.short_prefix());
        Self::create(conn, session_id, Some(&title))
    }

    /// Bump `updated_at` to now.
    pub fn touch(conn: &Connection, session_id: &SessionId) -> Result<()> {
        let _ = conn.execute(
            "UPDATE conversations SET updated_at = ?2 WHERE session_id = ?1",
            params![session_id.as_str(), now_rfc3339()],
        )?;
        Ok(())
    }

    /// Set the active flag.
    pub fn set_active(conn: &Connection, session_id: &SessionId, active: bool) -> Result<()> {
        let _ = conn.execute(
            "UPDATE conversations SET is_active = ?2, updated_at = ?3 WHERE session_id = ?1",
            params![session_id.as_str(), i64::from(active), now_rfc3339()],
        )?;
        Ok(())
    }

    /// List all sessions, most recently updated first.
    pub fn list(conn: &Connection) -> Result<Vec<SessionRecord>> {
        let mut stmt = conn.prepare(
            "SELECT session_id, title, created_at, updated_at, is_active
             FROM conversations ORDER BY updated_at DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SessionRecord {
                    session_id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                    is_active: row.get::<_, i64>(4)? != 0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
