//! # murmur-store
//!
//! `SQLite`-backed message log for the murmur backend.
//!
//! Layers, bottom up:
//!
//! - [`schema`] — table and index definitions, applied at open
//! - [`repositories`] — stateless repos; every method takes `&Connection`
//! - [`store::ConversationStore`] — pooled, async-friendly facade used by
//!   the server; blocking `SQLite` work runs on `spawn_blocking`
//!
//! ## Crate Position
//!
//! Depends on: murmur-core. Depended on by: murmur-server, murmur (bin).

#![deny(unsafe_code)]

pub mod errors;
pub mod pool;
pub mod repositories;
pub mod schema;
pub mod store;

pub use errors::{Result, StoreError};
pub use store::ConversationStore;
