//! Route table and middleware layers.

use axum::Router;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::http::{conversation, health};
use crate::state::AppState;
use crate::websocket::connection;

/// Build the full application router.
///
/// CORS origins come from settings; an empty list denies all cross-origin
/// access (same-origin and native clients are unaffected).
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .settings
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparseable cors origin");
                None
            }
        })
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/conversations", get(conversation::list_sessions))
        .route("/api/conversation/create", post(conversation::create_session))
        .route("/api/conversation/text-message", post(conversation::text_message))
        .route("/api/conversation/audio-upload", post(conversation::audio_upload))
        .route("/api/conversation/{session_id}", get(conversation::get_session))
        .route("/ws/{session_id}", get(connection::ws_route))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `GET /metrics` — Prometheus text exposition.
async fn metrics_endpoint(State(state): State<AppState>) -> String {
    crate::metrics::render(&state.metrics)
}
