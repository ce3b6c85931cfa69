//! # murmur-server
//!
//! HTTP + WebSocket surface of the murmur backend.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `websocket` | Session registry, frame protocol, per-connection dispatch loop |
//! | `http` | REST routes: session create/get, text and audio submission |
//! | `history` | Context-window assembly from the message log |
//! | `service` | Conversation orchestration shared by HTTP and the socket |
//! | `router` | Route table + CORS/trace layers |
//! | `state` | Shared handle bundle for route handlers |
//! | `errors` | `ApiError` with HTTP status mapping |
//! | `metrics` | Prometheus recorder and metric-name constants |
//!
//! ## Data Flow
//!
//! inbound frame → `websocket::connection` (dispatch) → `service` →
//! `history` + collaborators → outbound frame via `websocket::registry`.

#![deny(unsafe_code)]

pub mod errors;
pub mod history;
pub mod http;
pub mod metrics;
pub mod router;
pub mod service;
pub mod state;
pub mod websocket;

pub use router::build_router;
pub use state::AppState;
