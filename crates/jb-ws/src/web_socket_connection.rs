use crate::{
    ClientEvent, ConnectionConfig, ConnectionId, ConnectionRegistry, Metrics, NotificationRouter,
    Result as WsErrorResult, ShutdownGuard, WsError, parse_client_event,
};

use std::panic::Location;
use std::time::{Duration, Instant};

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use error_location::ErrorLocation;
use futures::{SinkExt, StreamExt};
use jb_auth::ConnectionRateLimiter;
use jb_core::Role;
use tokio::sync::mpsc;

/// Manages a single WebSocket connection
pub struct WebSocketConnection {
    connection_id: ConnectionId,
    user_id: String,
    role: Role,
    config: ConnectionConfig,
    metrics: Metrics,
    rate_limiter: ConnectionRateLimiter,
    registry: ConnectionRegistry,
    router: NotificationRouter,
}

impl WebSocketConnection {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connection_id: ConnectionId,
        user_id: String,
        role: Role,
        config: ConnectionConfig,
        metrics: Metrics,
        rate_limiter: ConnectionRateLimiter,
        registry: ConnectionRegistry,
        router: NotificationRouter,
    ) -> Self {
        Self {
            connection_id,
            user_id,
            role,
            config,
            metrics,
            rate_limiter,
            registry,
            router,
        }
    }

    /// Handle the WebSocket connection lifecycle.
    ///
    /// `tx`/`rx` are the two ends of the registered outbound queue: the
    /// router pushes frames into clones of `tx`, and the send task drains
    /// `rx` into the socket.
    pub async fn handle(
        self,
        socket: WebSocket,
        tx: mpsc::Sender<Message>,
        mut rx: mpsc::Receiver<Message>,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        log::info!(
            "WebSocket connection {} established for user {} ({})",
            self.connection_id,
            self.user_id,
            self.role
        );

        self.metrics.connection_established();

        // Split socket into sender and receiver
        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Spawn send task draining the outbound queue
        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if ws_sender.send(msg).await.is_err() {
                    break;
                }
            }
        });

        // First ping one interval in; an immediate tick would race the handshake
        let heartbeat_interval = Duration::from_secs(self.config.heartbeat_interval_secs);
        let mut heartbeat = tokio::time::interval_at(
            tokio::time::Instant::now() + heartbeat_interval,
            heartbeat_interval,
        );
        let heartbeat_timeout = Duration::from_secs(self.config.heartbeat_timeout_secs);
        let mut last_pong = Instant::now();

        let result = loop {
            tokio::select! {
                // Inbound frames from the client
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(msg)) => {
                            match self.handle_client_message(msg, &tx, &mut last_pong).await {
                                Ok(true) => {}
                                Ok(false) => break Ok(()),
                                Err(e) => {
                                    log::error!(
                                        "Error handling message from connection {}: {}",
                                        self.connection_id,
                                        e
                                    );
                                    self.metrics.error_occurred("message_handling");
                                    break Err(e);
                                }
                            }
                        }
                        Some(Err(e)) => {
                            log::error!(
                                "WebSocket error on connection {}: {}",
                                self.connection_id,
                                e
                            );
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            log::info!("Connection {} closed by client", self.connection_id);
                            break Ok(());
                        }
                    }
                }

                // Periodic heartbeat ping with idle timeout
                _ = heartbeat.tick() => {
                    if last_pong.elapsed() > heartbeat_timeout {
                        log::warn!(
                            "Connection {} missed heartbeat for {}s, closing",
                            self.connection_id,
                            self.config.heartbeat_timeout_secs
                        );
                        break Err(WsError::HeartbeatTimeout {
                            timeout_secs: self.config.heartbeat_timeout_secs,
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }

                    if tx.send(Message::Ping(Bytes::new())).await.is_err() {
                        // Send task gone, socket already dead
                        break Ok(());
                    }
                }

                // Graceful shutdown
                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down connection {} gracefully", self.connection_id);
                    break Ok(());
                }
            }
        };

        // Unregister first: the entry holds the last sender clone, so removal
        // (plus dropping our own tx) closes the queue and lets the send task
        // flush whatever is buffered and exit.
        self.registry
            .unregister_connection(&self.user_id, self.connection_id)
            .await;
        drop(tx);
        let _ = send_task.await;

        self.metrics
            .connection_closed(if result.is_ok() { "normal" } else { "error" });

        log::info!(
            "WebSocket connection {} closed for user {}",
            self.connection_id,
            self.user_id
        );

        result
    }

    /// Handle one frame from the client.
    /// Returns Ok(false) when the client requested close.
    async fn handle_client_message(
        &self,
        msg: Message,
        tx: &mpsc::Sender<Message>,
        last_pong: &mut Instant,
    ) -> WsErrorResult<bool> {
        match msg {
            Message::Text(text) => {
                self.handle_client_event(text.as_str()).await?;
                Ok(true)
            }
            Message::Binary(data) => {
                log::debug!(
                    "Ignoring binary frame ({} bytes) from connection {}",
                    data.len(),
                    self.connection_id
                );
                Ok(true)
            }
            Message::Ping(data) => {
                tx.send(Message::Pong(data))
                    .await
                    .map_err(|_| WsError::SendBufferFull {
                        location: ErrorLocation::from(Location::caller()),
                    })?;
                Ok(true)
            }
            Message::Pong(_) => {
                *last_pong = Instant::now();
                Ok(true)
            }
            Message::Close(_) => {
                log::info!("Received close frame from connection {}", self.connection_id);
                Ok(false)
            }
        }
    }

    /// Parse and dispatch one client-emitted event through the router.
    ///
    /// Rate-limit violations are fatal to the connection; a malformed
    /// event is logged and dropped without tearing the connection down.
    async fn handle_client_event(&self, text: &str) -> WsErrorResult<()> {
        self.rate_limiter.check().map_err(|e| {
            log::warn!(
                "Rate limit exceeded for connection {} (user {})",
                self.connection_id,
                self.user_id
            );
            WsError::Internal {
                message: format!("Rate limit: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let (event, data) = match parse_client_event(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!(
                    "Malformed client event on connection {}: {}",
                    self.connection_id,
                    e
                );
                self.metrics.error_occurred("malformed_event");
                return Ok(());
            }
        };

        let outcome = match &event {
            ClientEvent::JobApplied(e) => {
                self.metrics.client_event_received("job_applied");
                self.router
                    .notify_new_application(&e.employer_id, &e.applicant_name, &e.job_title, data)
                    .await
            }
            ClientEvent::ApplicationStatusUpdated(e) => {
                self.metrics.client_event_received("application_status_updated");
                self.router
                    .notify_status_update(&e.applicant_id, &e.job_title, &e.status, data)
                    .await
            }
            ClientEvent::InterviewScheduled(e) => {
                self.metrics.client_event_received("interview_scheduled");
                self.router
                    .notify_interview_scheduled(&e.applicant_id, &e.job_title, &e.date, data)
                    .await
            }
        };

        match outcome {
            Ok(result) => {
                log::debug!(
                    "Client event from connection {} routed: {:?}",
                    self.connection_id,
                    result
                );
            }
            Err(e) => {
                // Routing failure is this connection's problem to log, not fatal
                log::warn!(
                    "Failed to route client event from connection {}: {}",
                    self.connection_id,
                    e
                );
                self.metrics.error_occurred("event_routing");
            }
        }

        Ok(())
    }
}
