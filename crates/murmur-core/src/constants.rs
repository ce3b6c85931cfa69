//! Shared constants.

/// Default display title for a session created without an explicit title.
pub const DEFAULT_SESSION_TITLE: &str = "New Conversation";

/// How many leading characters of a session id are used when deriving an
/// implicit title (`"Session {prefix}"`) for sessions auto-created on first
/// socket contact.
pub const SESSION_TITLE_PREFIX_LEN: usize = 8;
