//! Branded ID newtypes.
//!
//! Session ids are opaque strings. Generated ids use a `sess_` prefix over a
//! UUIDv7 so they sort roughly by creation time, but caller-supplied ids of
//! any shape are accepted — the store keys on the raw string.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque session identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh session id (`sess_` + UUIDv7).
    pub fn generate() -> Self {
        Self(format!("sess_{}", Uuid::now_v7()))
    }

    /// Wrap a caller-supplied identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters used for implicit session titles.
    pub fn short_prefix(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(crate::constants::SESSION_TITLE_PREFIX_LEN)
            .map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
