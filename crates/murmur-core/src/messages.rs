//! Session and message record types shared between the store and the server.

use serde::{Deserialize, Serialize};

/// Kind tag for a stored message.
///
/// Wire and storage form is snake_case (`user_text`, `user_audio`,
/// `ai_response`), matching the client protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Text typed by the user.
    UserText,
    /// Transcript of audio spoken by the user.
    UserAudio,
    /// Generated assistant reply.
    AiResponse,
}

impl MessageKind {
    /// Storage/wire string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserText => "user_text",
            Self::UserAudio => "user_audio",
            Self::AiResponse => "ai_response",
        }
    }

    /// Parse the storage/wire string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user_text" => Some(Self::UserText),
            "user_audio" => Some(Self::UserAudio),
            "ai_response" => Some(Self::AiResponse),
            _ => None,
        }
    }

    /// Whether this kind is a user turn (text or audio transcript).
    pub fn is_user(self) -> bool {
        matches!(self, Self::UserText | Self::UserAudio)
    }
}

/// A persisted conversation session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Opaque session identifier (unique).
    pub session_id: String,
    /// Display title.
    pub title: String,
    /// ISO 8601 creation time.
    pub created_at: String,
    /// ISO 8601 last-update time.
    pub updated_at: String,
    /// Whether the session is still active.
    pub is_active: bool,
}

/// A persisted message. Immutable once written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    /// Store-assigned row id (monotonic within a session).
    pub id: i64,
    /// Owning session.
    pub session_id: String,
    /// Message text (user input, transcript, or generated reply).
    pub content: String,
    /// Kind tag.
    pub kind: MessageKind,
    /// ISO 8601 creation time.
    pub timestamp: String,
    /// Audio duration in seconds, for `user_audio` messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_duration: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in [
            MessageKind::UserText,
            MessageKind::UserAudio,
            MessageKind::AiResponse,
        ] {
            assert_eq!(MessageKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn kind_parse_rejects_unknown() {
        assert_eq!(MessageKind::parse("assistant"), None);
        assert_eq!(MessageKind::parse(""), None);
    }

    #[test]
    fn kind_serde_is_snake_case() {
        let json = serde_json::to_string(&MessageKind::AiResponse).unwrap();
        assert_eq!(json, "\"ai_response\"");
        let back: MessageKind = serde_json::from_str("\"user_audio\"").unwrap();
        assert_eq!(back, MessageKind::UserAudio);
    }

    #[test]
    fn user_kinds_are_user() {
        assert!(MessageKind::UserText.is_user());
        assert!(MessageKind::UserAudio.is_user());
        assert!(!MessageKind::AiResponse.is_user());
    }

    #[test]
    fn message_record_serializes_camel_case() {
        let msg = MessageRecord {
            id: 1,
            session_id: "sess_a".into(),
            content: "hi".into(),
            kind: MessageKind::UserText,
            timestamp: "2026-01-01T00:00:00+00:00".into(),
            audio_duration: None,
        };
        let val = serde_json::to_value(&msg).unwrap();
        assert_eq!(val["sessionId"], "sess_a");
        assert_eq!(val["kind"], "user_text");
        // None audio duration is omitted entirely
        assert!(val.get("audioDuration").is_none());
    }

    #[test]
    fn audio_duration_serialized_when_present() {
        let msg = MessageRecord {
            id: 2,
            session_id: "sess_a".into(),
            content: "spoken".into(),
            kind: MessageKind::UserAudio,
            timestamp: "2026-01-01T00:00:00+00:00".into(),
            audio_duration: Some(2.5),
        };
        let val = serde_json::to_value(&msg).unwrap();
        assert_eq!(val["audioDuration"], 2.5);
    }
}
