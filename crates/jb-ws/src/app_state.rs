use crate::{
    ConnectionConfig, ConnectionRegistry, Metrics, NotificationRouter, ShutdownCoordinator,
    WebSocketConnection,
};

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::Response,
};
use jb_auth::{JwtValidator, RateLimiterFactory};
use jb_core::Role;
use log::{debug, info, warn};
use tokio::sync::mpsc;

/// Shared application state for WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_validator: Arc<JwtValidator>,
    pub rate_limiter_factory: RateLimiterFactory,
    pub registry: ConnectionRegistry,
    pub router: NotificationRouter,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
    /// Connect attempts beyond this count are refused before registration
    pub max_connections: usize,
}

/// WebSocket upgrade handler
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    // Authentication gates registration: no identity, no entry
    let (user_id, role) = extract_identity(&headers, &state.jwt_validator)?;
    debug!("WebSocket upgrade request from user {user_id} ({role})");

    // Advisory capacity gate; a concurrent connect may briefly overshoot
    if state.registry.count_all().await >= state.max_connections {
        warn!("Connection limit reached ({}), rejecting user {user_id}", state.max_connections);
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    // Create the outbound queue and register; last connection wins
    let (tx, rx) = mpsc::channel::<Message>(state.config.send_buffer_size);
    let (connection_id, replaced) = state
        .registry
        .register(user_id.clone(), role, tx.clone())
        .await;

    if let Some(replaced) = replaced {
        // Close the superseded transport rather than leaking it
        let _ = replaced.sender.try_send(Message::Close(None));
        state.metrics.connection_replaced();
        info!(
            "User {user_id} reconnected, closing superseded connection {}",
            replaced.connection_id
        );
    }

    // Create rate limiter for this connection
    let rate_limiter = state.rate_limiter_factory.create();

    // Upgrade to WebSocket
    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, connection_id, user_id, role, tx, rx, state, rate_limiter)
    }))
}

/// Handle WebSocket connection after upgrade
#[allow(clippy::too_many_arguments)]
async fn handle_socket(
    socket: WebSocket,
    connection_id: crate::ConnectionId,
    user_id: String,
    role: Role,
    tx: mpsc::Sender<Message>,
    rx: mpsc::Receiver<Message>,
    state: AppState,
    rate_limiter: jb_auth::ConnectionRateLimiter,
) {
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(
        connection_id,
        user_id,
        role,
        state.config.clone(),
        state.metrics.clone(),
        rate_limiter,
        state.registry.clone(),
        state.router.clone(),
    );

    // Handle connection lifecycle; the connection unregisters itself on exit
    let result = connection.handle(socket, tx, rx, shutdown_guard).await;

    if let Err(e) = result {
        log::error!("Connection {connection_id} error: {e}");
    }
}

/// Extract and validate (user_id, role) from JWT in Authorization header
fn extract_identity(
    headers: &HeaderMap,
    validator: &JwtValidator,
) -> Result<(String, Role), StatusCode> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header");
            StatusCode::UNAUTHORIZED
        })?;

    if !auth_header.starts_with("Bearer ") {
        warn!("Invalid authorization scheme: expected 'Bearer'");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = &auth_header[7..];

    let claims = validator.validate(token).map_err(|e| {
        warn!("JWT validation failed: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    let role = claims.role().map_err(|e| {
        warn!("JWT role claim rejected: {}", e);
        StatusCode::UNAUTHORIZED
    })?;

    Ok((claims.sub, role))
}
