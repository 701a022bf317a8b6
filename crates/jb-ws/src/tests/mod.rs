
use crate::{ConnectionRegistry, Metrics, NotificationRouter, RouterConfig};

use axum::extract::ws::Message;
use tokio::sync::mpsc;

/// Outbound queue pair sized like a small production buffer
pub(crate) fn test_channel() -> (mpsc::Sender<Message>, mpsc::Receiver<Message>) {
    mpsc::channel(16)
}

/// Router over a fresh registry with a short send timeout
pub(crate) fn test_router(registry: &ConnectionRegistry) -> NotificationRouter {
    NotificationRouter::new(
        registry.clone(),
        RouterConfig {
            send_timeout_secs: 1,
            max_concurrent_pushes: 8,
        },
        Metrics::new(),
    )
}
