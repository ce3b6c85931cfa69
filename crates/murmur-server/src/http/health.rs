//! Liveness and identity endpoints.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// `GET /` — service identity.
pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": state.settings.name,
        "version": state.settings.version,
        "status": "ok",
    }))
}

/// `GET /health` — liveness probe with the current connection count.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "activeConnections": state.registry.connection_count(),
    }))
}
