//! Table and index definitions.

use rusqlite::Connection;

use crate::errors::Result;

/// DDL applied at every open. All statements are idempotent.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS conversations (
    session_id  TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS messages (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id     TEXT NOT NULL REFERENCES conversations(session_id),
    content        TEXT NOT NULL,
    kind           TEXT NOT NULL,
    timestamp      TEXT NOT NULL,
    audio_duration REAL
);

CREATE INDEX IF NOT EXISTS idx_messages_session_time
    ON messages(session_id, timestamp, id);
";

/// Apply the schema and per-connection pragmas.
pub fn init_schema(conn: &Connection) -> Result<()> {
    // journal_mode returns a row, so it goes through pragma_update rather
    // than execute_batch
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_applies_to_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert!(tables.contains(&"conversations".to_string()));
        assert!(tables.contains(&"messages".to_string()));
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn foreign_key_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let res = conn.execute(
            "INSERT INTO messages (session_id, content, kind, timestamp)
             VALUES ('missing', 'x', 'user_text', '2026-01-01T00:00:00+00:00')",
            [],
        );
        assert!(res.is_err(), "insert without session must fail");
    }
}
