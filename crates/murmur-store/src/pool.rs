//! Connection pooling over `r2d2_sqlite`.

use std::path::Path;

use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::errors::Result;
use crate::schema::init_schema;

/// Pool of `SQLite` connections.
pub type ConnectionPool = r2d2::Pool<SqliteConnectionManager>;

/// One checked-out connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Open (or create) the database at `path`, apply the schema, and return a
/// pool.
pub fn open_pool(path: impl AsRef<Path>) -> Result<ConnectionPool> {
    let path = path.as_ref();
    // foreign_keys and busy_timeout are per-connection, so they are set in
    // the manager's init hook rather than once at open
    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
    });
    let pool = r2d2::Pool::builder().max_size(8).build(manager)?;
    let conn = pool.get()?;
    init_schema(&conn)?;
    info!(path = %path.display(), "message log opened");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_pool_creates_file_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("murmur.db");
        let pool = open_pool(&path).unwrap();
        assert!(path.exists());

        // Schema is usable from a second pooled connection
        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
