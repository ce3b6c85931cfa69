//! Generator trait, chat message types, and error taxonomy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role of a context-window entry as seen by the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A user turn (typed text or audio transcript).
    User,
    /// A prior generated reply.
    Assistant,
}

/// One entry of the context window handed to a generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker role.
    pub role: Role,
    /// Plain-text content.
    pub content: String,
}

impl ChatMessage {
    /// Construct a user entry.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Construct an assistant entry.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Errors that can occur during a generation call.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("http error: {0}")]
    Http(String),

    /// Request exceeded the configured timeout.
    #[error("generation timed out")]
    Timeout,

    /// Provider returned a non-success status.
    #[error("provider returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error body (may be truncated).
        message: String,
    },

    /// Provider response was not in the expected shape.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GeneratorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e.to_string())
        }
    }
}

/// A collaborator that turns (input, bounded history) into a reply.
///
/// Implementations may fail or be slow; callers are expected to wrap calls
/// in their own timeout boundary.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generate a reply to `input` given prior `history` (chronological,
    /// oldest first).
    async fn generate(
        &self,
        input: &str,
        history: &[ChatMessage],
    ) -> Result<String, GeneratorError>;
}
