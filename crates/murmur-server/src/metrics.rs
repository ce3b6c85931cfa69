//! Prometheus metrics recorder and `/metrics` endpoint handler.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the `/metrics` endpoint.
/// Must be called once at server startup before any metrics are recorded.
pub fn install_recorder() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install metrics recorder");
    info!("prometheus metrics recorder installed");
    handle
}

/// Render Prometheus text format from the installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

// Metric name constants to avoid typos across crates.

/// WebSocket connections opened total (counter).
pub const WS_CONNECTIONS_TOTAL: &str = "ws_connections_total";
/// WebSocket disconnections total (counter).
pub const WS_DISCONNECTIONS_TOTAL: &str = "ws_disconnections_total";
/// Active WebSocket connections (gauge).
pub const WS_CONNECTIONS_ACTIVE: &str = "ws_connections_active";
/// Registry entries replaced by a newer socket for the same session (counter).
pub const WS_CONNECTIONS_REPLACED_TOTAL: &str = "ws_connections_replaced_total";
/// Outbound frames dropped because the writer channel was full or gone (counter).
pub const WS_DELIVERY_DROPS_TOTAL: &str = "ws_delivery_drops_total";
/// Inbound frames dispatched (counter, labels: kind).
pub const WS_FRAMES_TOTAL: &str = "ws_frames_total";
/// Conversation turns completed (counter, labels: source).
pub const TURNS_TOTAL: &str = "turns_total";
/// Conversation turns failed (counter, labels: source, stage).
pub const TURN_ERRORS_TOTAL: &str = "turn_errors_total";
/// End-to-end turn duration seconds (histogram, labels: source).
pub const TURN_DURATION_SECONDS: &str = "turn_duration_seconds";
/// Generator requests total (counter, labels: model). Recorded in murmur-llm.
pub const GENERATOR_REQUESTS_TOTAL: &str = "generator_requests_total";
/// Generator errors total (counter, labels: model). Recorded in murmur-llm.
pub const GENERATOR_ERRORS_TOTAL: &str = "generator_errors_total";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_and_render() {
        // Build a recorder + handle (no global install to avoid test conflicts).
        let handle = PrometheusBuilder::new().build_recorder().handle();

        // Should produce valid (possibly empty) Prometheus text.
        let output = handle.render();
        assert!(output.is_empty() || output.contains('#') || output.contains('\n'));
    }

    #[test]
    fn metric_constants_are_snake_case() {
        let names = [
            WS_CONNECTIONS_TOTAL,
            WS_DISCONNECTIONS_TOTAL,
            WS_CONNECTIONS_ACTIVE,
            WS_CONNECTIONS_REPLACED_TOTAL,
            WS_DELIVERY_DROPS_TOTAL,
            WS_FRAMES_TOTAL,
            TURNS_TOTAL,
            TURN_ERRORS_TOTAL,
            TURN_DURATION_SECONDS,
            GENERATOR_REQUESTS_TOTAL,
            GENERATOR_ERRORS_TOTAL,
        ];
        for name in names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "metric name '{name}' must be snake_case"
            );
        }
    }
}
