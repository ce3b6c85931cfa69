//! WebSocket upgrade and per-connection dispatch loop.
//!
//! Each connection runs two tasks: the read loop below (owns dispatch) and a
//! writer task draining the outbound channel in FIFO order. Frames are
//! dispatched strictly sequentially — the next inbound frame is not read
//! until the previous turn's outbound frame has been enqueued, which is what
//! guarantees per-connection reply ordering.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge};
use murmur_core::ids::SessionId;
use tracing::{debug, info, warn};

use super::frames::{self, ClientFrame, FrameDecodeError, ServerFrame};
use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_DISCONNECTIONS_TOTAL, WS_FRAMES_TOTAL,
};
use crate::state::AppState;

/// Outbound channel depth per connection. Replies are produced one per
/// inbound frame, so a small buffer is enough.
const OUTBOUND_BUFFER: usize = 32;

/// Assumed container format for audio arriving over the socket, where no
/// content type accompanies the payload.
const WS_AUDIO_MIME: &str = "audio/wav";

/// `GET /ws/{session_id}` — upgrade to the persistent socket protocol.
pub async fn ws_route(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, state))
}

/// Outcome of dispatching one inbound frame.
enum FrameOutcome {
    /// Enqueue a reply and keep reading.
    Reply(ServerFrame),
    /// Tear the connection down.
    Fatal,
}

async fn handle_socket(socket: WebSocket, session_id: String, state: AppState) {
    let session_id = SessionId::new(session_id);
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(OUTBOUND_BUFFER);

    let generation = state.registry.register(session_id.as_str(), tx).await;
    counter!(WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).set(state.registry.connection_count() as f64);
    info!(session_id = %session_id, "websocket connected");

    // Writer task: drains the outbound channel in FIFO order. Exits when
    // every sender is gone (the registry entry is removed) or the peer went
    // away.
    let writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // The session record must exist before the first frame is dispatched.
    if let Err(e) = state.service.resolve_session(&session_id).await {
        warn!(session_id = %session_id, error = %e, "failed to resolve session, closing");
        let _ = state
            .registry
            .unregister(session_id.as_str(), generation)
            .await;
        gauge!(WS_CONNECTIONS_ACTIVE).set(state.registry.connection_count() as f64);
        return;
    }

    while let Some(message) = stream.next().await {
        let Ok(message) = message else { break };
        match message {
            Message::Text(text) => {
                match handle_frame(&state, &session_id, text.as_str()).await {
                    FrameOutcome::Reply(frame) => {
                        let _ = state.registry.deliver(session_id.as_str(), &frame).await;
                    }
                    FrameOutcome::Fatal => break,
                }
            }
            Message::Close(_) => break,
            // Protocol-level ping/pong is answered by axum; binary is not
            // part of this protocol.
            _ => {}
        }
    }

    let removed = state
        .registry
        .unregister(session_id.as_str(), generation)
        .await;
    counter!(WS_DISCONNECTIONS_TOTAL).increment(1);
    gauge!(WS_CONNECTIONS_ACTIVE).set(state.registry.connection_count() as f64);
    info!(session_id = %session_id, removed, "websocket disconnected");

    // Removing the registry entry drops the last sender, so the writer
    // drains whatever is queued and exits on its own.
    let _ = writer.await;
}

/// Dispatch one inbound text frame.
///
/// Collaborator failures are recoverable (error frame, connection stays
/// open); only a broken envelope is fatal.
async fn handle_frame(state: &AppState, session_id: &SessionId, text: &str) -> FrameOutcome {
    let frame = match frames::decode_client_frame(text) {
        Ok(frame) => frame,
        Err(FrameDecodeError::UnknownType(t)) => {
            debug!(session_id = %session_id, frame_type = %t, "unknown frame type");
            return FrameOutcome::Reply(ServerFrame::error(format!("unknown frame type: {t}")));
        }
        Err(e @ FrameDecodeError::Malformed(_)) => {
            warn!(session_id = %session_id, error = %e, "malformed frame, closing connection");
            return FrameOutcome::Fatal;
        }
    };
    counter!(WS_FRAMES_TOTAL, "kind" => frame.kind()).increment(1);

    match frame {
        ClientFrame::Ping => FrameOutcome::Reply(ServerFrame::Pong),
        ClientFrame::TextMessage { content } => {
            match state.service.process_text(session_id, &content).await {
                Ok(turn) => FrameOutcome::Reply(ServerFrame::AiResponse {
                    transcript: turn.transcript,
                    ai_response: turn.reply,
                    timestamp: turn.ai_message.timestamp,
                }),
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "text turn failed");
                    FrameOutcome::Reply(ServerFrame::error(e))
                }
            }
        }
        ClientFrame::AudioData { audio } => {
            let bytes = match decode_audio_payload(&audio) {
                Ok(bytes) => bytes,
                Err(e) => {
                    return FrameOutcome::Reply(ServerFrame::error(format!(
                        "invalid base64 audio: {e}"
                    )));
                }
            };
            match state
                .service
                .process_audio(session_id, &bytes, WS_AUDIO_MIME)
                .await
            {
                Ok(turn) => FrameOutcome::Reply(ServerFrame::AiResponse {
                    transcript: turn.transcript,
                    ai_response: turn.reply,
                    timestamp: turn.ai_message.timestamp,
                }),
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "audio turn failed");
                    FrameOutcome::Reply(ServerFrame::error(e))
                }
            }
        }
    }
}

/// Decode a base64 audio payload, tolerating a `data:` URI prefix.
fn decode_audio_payload(audio: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = audio
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(',').map(|(_, data)| data))
        .unwrap_or(audio);
    BASE64.decode(payload.trim())
}
