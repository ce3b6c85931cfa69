//! Shared application state handed to every route handler.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use murmur_settings::MurmurSettings;
use murmur_store::store::ConversationStore;

use crate::service::ConversationService;
use crate::websocket::registry::SessionRegistry;

/// Cheap-to-clone handle bundle for the router.
#[derive(Clone)]
pub struct AppState {
    /// Turn pipeline shared by HTTP and the socket.
    pub service: Arc<ConversationService>,
    /// Connection registry for outbound frame routing.
    pub registry: Arc<SessionRegistry>,
    /// Settings snapshot taken at startup.
    pub settings: Arc<MurmurSettings>,
    /// Renders the `/metrics` endpoint.
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// The store behind the service, for read-only route handlers.
    pub fn store(&self) -> &ConversationStore {
        self.service.store()
    }
}
