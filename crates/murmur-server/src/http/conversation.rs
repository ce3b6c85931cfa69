//! Conversation routes: session lifecycle and one-shot turn submission.
//!
//! The HTTP surface shares the turn pipeline with the socket — a client can
//! create a session over HTTP, continue it over the socket, and fetch the
//! full transcript over HTTP again.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use murmur_core::ids::SessionId;
use murmur_core::messages::{MessageRecord, SessionRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ApiError;
use crate::state::AppState;

/// Query parameters for `POST /api/conversation/create`.
#[derive(Debug, Deserialize)]
pub struct CreateSessionQuery {
    /// Optional display title. Defaults to an id-derived title.
    pub title: Option<String>,
}

/// `POST /api/conversation/create` — create a session with a fresh id.
pub async fn create_session(
    State(state): State<AppState>,
    Query(query): Query<CreateSessionQuery>,
) -> Result<Json<SessionRecord>, ApiError> {
    let session = state.store().create_session(query.title).await?;
    debug!(session_id = %session.session_id, "session created");
    Ok(Json(session))
}

/// `GET /api/conversations` — list all sessions, most recently updated first.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionRecord>>, ApiError> {
    Ok(Json(state.store().list_sessions().await?))
}

/// Session plus its full chronological transcript.
#[derive(Debug, Serialize)]
pub struct SessionDetail {
    /// The session record.
    #[serde(flatten)]
    pub session: SessionRecord,
    /// All messages, oldest first.
    pub messages: Vec<MessageRecord>,
}

/// `GET /api/conversation/{session_id}` — fetch a session and its messages.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionDetail>, ApiError> {
    let id = SessionId::new(session_id);
    let Some(session) = state.store().get_session(id.clone()).await? else {
        return Err(ApiError::SessionNotFound(id.to_string()));
    };
    let messages = state.store().list_messages(id).await?;
    Ok(Json(SessionDetail { session, messages }))
}

/// Body of `POST /api/conversation/text-message`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessageRequest {
    /// Target session. Created implicitly if absent.
    pub session_id: String,
    /// The user's message.
    pub message: String,
}

/// A completed turn, as returned by the one-shot routes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    /// The session the turn belongs to.
    pub session_id: String,
    /// What the user said (typed text or audio transcript).
    pub transcript: String,
    /// The generated reply.
    pub ai_response: String,
    /// ISO 8601 time the reply was persisted.
    pub timestamp: String,
}

/// `POST /api/conversation/text-message` — run one turn from typed text.
pub async fn text_message(
    State(state): State<AppState>,
    Json(request): Json<TextMessageRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".into()));
    }
    let id = SessionId::new(request.session_id);
    let turn = state.service.process_text(&id, &request.message).await?;
    Ok(Json(TurnResponse {
        session_id: id.to_string(),
        transcript: turn.transcript,
        ai_response: turn.reply,
        timestamp: turn.ai_message.timestamp,
    }))
}

/// Query parameters for `POST /api/conversation/audio-upload`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioUploadQuery {
    /// Target session. Created implicitly if absent.
    pub session_id: String,
}

/// `POST /api/conversation/audio-upload` — run one turn from an uploaded
/// audio file (multipart field `audio`).
pub async fn audio_upload(
    State(state): State<AppState>,
    Query(query): Query<AudioUploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<TurnResponse>, ApiError> {
    let mut audio: Option<(Vec<u8>, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            let mime = field
                .content_type()
                .unwrap_or("audio/wav")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read audio field: {e}")))?;
            audio = Some((bytes.to_vec(), mime));
            break;
        }
    }
    let Some((bytes, mime)) = audio else {
        return Err(ApiError::BadRequest(
            "missing multipart field \"audio\"".into(),
        ));
    };
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("audio payload is empty".into()));
    }

    let id = SessionId::new(query.session_id);
    let turn = state.service.process_audio(&id, &bytes, &mime).await?;
    Ok(Json(TurnResponse {
        session_id: id.to_string(),
        transcript: turn.transcript,
        ai_response: turn.reply,
        timestamp: turn.ai_message.timestamp,
    }))
}
