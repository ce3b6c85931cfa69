//! Session → outbound channel map.
//!
//! At most one live connection per session: registering a session that is
//! already present replaces the previous entry, and the replaced socket's
//! eventual teardown must not evict its replacement. Each registration gets
//! a generation token; `unregister` is a no-op unless the token matches the
//! current entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use metrics::counter;
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::frames::ServerFrame;
use crate::metrics::{WS_CONNECTIONS_REPLACED_TOTAL, WS_DELIVERY_DROPS_TOTAL};

struct RegisteredSender {
    sender: mpsc::Sender<String>,
    generation: u64,
}

/// Connection registry keyed by session id.
pub struct SessionRegistry {
    connections: RwLock<HashMap<String, RegisteredSender>>,
    /// Atomic counter tracking registered sessions (avoids read-locking for count queries).
    active_count: AtomicUsize,
    next_generation: AtomicU64,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            active_count: AtomicUsize::new(0),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Register `sender` as the outbound channel for `session_id`.
    ///
    /// Replaces any existing entry for the session. Returns the generation
    /// token the caller must present to [`unregister`](Self::unregister).
    pub async fn register(&self, session_id: &str, sender: mpsc::Sender<String>) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut conns = self.connections.write().await;
        let previous = conns.insert(
            session_id.to_string(),
            RegisteredSender { sender, generation },
        );
        if previous.is_none() {
            let _ = self.active_count.fetch_add(1, Ordering::Relaxed);
        } else {
            counter!(WS_CONNECTIONS_REPLACED_TOTAL).increment(1);
            debug!(session_id, "replaced existing connection for session");
        }
        generation
    }

    /// Remove the entry for `session_id` if it still belongs to `generation`.
    ///
    /// Returns whether an entry was removed. A stale token (the connection
    /// was replaced after this caller registered) leaves the map untouched.
    pub async fn unregister(&self, session_id: &str, generation: u64) -> bool {
        let mut conns = self.connections.write().await;
        match conns.get(session_id) {
            Some(entry) if entry.generation == generation => {
                let _ = conns.remove(session_id);
                let _ = self.active_count.fetch_sub(1, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    /// Serialize `frame` and enqueue it for the session's connection.
    ///
    /// Best effort: an absent session, a full writer channel, or a closed
    /// receiver all absorb the frame and return `false`. Delivery failures
    /// never propagate to the dispatch path.
    pub async fn deliver(&self, session_id: &str, frame: &ServerFrame) -> bool {
        let json = match serde_json::to_string(frame) {
            Ok(j) => j,
            Err(e) => {
                warn!(session_id, error = %e, "failed to serialize outbound frame");
                return false;
            }
        };
        let conns = self.connections.read().await;
        let Some(entry) = conns.get(session_id) else {
            debug!(session_id, "no connection registered, dropping frame");
            return false;
        };
        match entry.sender.try_send(json) {
            Ok(()) => true,
            Err(e) => {
                counter!(WS_DELIVERY_DROPS_TOTAL).increment(1);
                warn!(session_id, error = %e, "failed to enqueue outbound frame");
                false
            }
        }
    }

    /// Number of registered sessions.
    pub fn connection_count(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }

    /// Whether a connection is registered for `session_id`.
    pub async fn is_registered(&self, session_id: &str) -> bool {
        self.connections.read().await.contains_key(session_id)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
