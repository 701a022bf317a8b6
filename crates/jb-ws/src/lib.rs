pub mod app_state;
pub mod client_event;
pub mod connection_config;
pub mod connection_entry;
pub mod connection_id;
pub mod connection_registry;
pub mod delivery_result;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod notification_router;
pub mod router_config;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use app_state::{AppState, handler};
pub use client_event::{
    ApplicationStatusUpdated, ClientEvent, InterviewScheduled, JobApplied, parse_client_event,
};
pub use connection_config::ConnectionConfig;
pub use connection_entry::ConnectionEntry;
pub use connection_id::ConnectionId;
pub use connection_registry::ConnectionRegistry;
pub use delivery_result::DeliveryResult;
pub use envelope::{DIRECT_EVENT, Envelope};
pub use error::{Result, WsError};
pub use metrics::Metrics;
pub use notification_router::NotificationRouter;
pub use router_config::RouterConfig;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::WebSocketConnection;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one delivery attempt.
/// All log entries within the push will include these fields.
pub fn create_delivery_span(event: &str, user_id: &str, kind: &str) -> tracing::Span {
    info_span!(
        "notify",
        event = %event,
        user_id = %user_id,
        kind = %kind,
    )
}
