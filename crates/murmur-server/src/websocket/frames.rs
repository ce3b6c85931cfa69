//! Wire frames for the persistent socket protocol.
//!
//! Every frame is a JSON object with a `type` discriminator. Inbound frames
//! with a well-formed envelope but an unrecognized `type` are recoverable
//! (the connection answers with an error frame and stays open); anything
//! that fails envelope decoding is fatal to the connection.

use serde::{Deserialize, Serialize};

/// Frames a client may send.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// A typed user message.
    TextMessage {
        /// The message text.
        content: String,
    },
    /// A spoken user message, base64-encoded audio bytes.
    AudioData {
        /// Base64 payload. A `data:` URI prefix is tolerated.
        audio: String,
    },
    /// Application-level liveness probe.
    Ping,
}

impl ClientFrame {
    /// Discriminator string, for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TextMessage { .. } => "text_message",
            Self::AudioData { .. } => "audio_data",
            Self::Ping => "ping",
        }
    }
}

/// Frames the server sends back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// A completed conversation turn.
    AiResponse {
        /// What the user said (typed text or audio transcript).
        transcript: String,
        /// The generated reply.
        ai_response: String,
        /// ISO 8601 time the reply was persisted.
        timestamp: String,
    },
    /// A recoverable failure; the connection stays open.
    Error {
        /// Human-readable reason.
        message: String,
    },
    /// Answer to a `ping`.
    Pong,
}

impl ServerFrame {
    /// Build an error frame from any displayable failure.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::Error {
            message: message.to_string(),
        }
    }
}

/// Why an inbound frame could not be dispatched.
#[derive(Debug, thiserror::Error)]
pub enum FrameDecodeError {
    /// The envelope itself is broken: not JSON, not an object, no `type`
    /// string, or a known type with missing/mistyped fields. Fatal.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// A well-formed envelope carrying a `type` this server does not know.
    /// Recoverable.
    #[error("unknown frame type: {0}")]
    UnknownType(String),
}

const KNOWN_TYPES: [&str; 3] = ["text_message", "audio_data", "ping"];

/// Decode one inbound frame, classifying failures as fatal or recoverable.
pub fn decode_client_frame(text: &str) -> Result<ClientFrame, FrameDecodeError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| FrameDecodeError::Malformed(e.to_string()))?;
    let Some(frame_type) = value.get("type").and_then(serde_json::Value::as_str) else {
        return Err(FrameDecodeError::Malformed(
            "missing string \"type\" field".to_string(),
        ));
    };
    let frame_type = frame_type.to_string();
    match serde_json::from_value::<ClientFrame>(value) {
        Ok(frame) => Ok(frame),
        Err(e) if KNOWN_TYPES.contains(&frame_type.as_str()) => {
            Err(FrameDecodeError::Malformed(e.to_string()))
        }
        Err(_) => Err(FrameDecodeError::UnknownType(frame_type)),
    }
}
