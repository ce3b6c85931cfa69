//! Store error types.

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the message log.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying `SQLite` failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool exhausted or broken.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Referenced session does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// A stored row failed validation (e.g. unknown message kind tag).
    #[error("corrupt row: {0}")]
    CorruptRow(String),

    /// Internal failure (blocking task join, lock poisoning).
    #[error("internal store error: {0}")]
    Internal(String),
}
