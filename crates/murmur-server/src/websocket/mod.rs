//! WebSocket surface: frame protocol, session registry, dispatch loop.
//!
//! ## Submodules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `frames` | Client/server frame types and envelope decoding |
//! | `registry` | Session → outbound channel map (one connection per session) |
//! | `connection` | WebSocket upgrade, writer task, sequential frame dispatch |
//!
//! ## Data Flow
//!
//! socket read → `frames::decode_client_frame` → `connection::handle_frame`
//! → service → outbound `ServerFrame` routed through `registry::deliver`.

pub mod connection;
pub mod frames;
pub mod registry;
