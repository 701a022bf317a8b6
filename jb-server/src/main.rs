use jb_auth::{JwtValidator, RateLimiterFactory};
use jb_server::{ServerError, build_router, logger};
use jb_ws::{
    AppState, ConnectionConfig, ConnectionRegistry, Metrics, NotificationRouter, RouterConfig,
    ShutdownCoordinator,
};

use std::error::Error;
use std::sync::Arc;

use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = jb_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = jb_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting jb-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    // Create JWT validator; validate() guarantees exactly one key source
    let jwt_validator = if let Some(ref secret) = config.auth.jwt_secret {
        info!("JWT: HS256 authentication enabled");
        JwtValidator::with_hs256(secret.as_bytes())
    } else if let Some(ref key_path) = config.auth.jwt_public_key_path {
        let config_dir = jb_config::Config::config_dir()?;
        let full_path = config_dir.join(key_path);
        let public_key =
            std::fs::read_to_string(&full_path).map_err(|e| ServerError::JwtKeyFile {
                path: full_path.display().to_string(),
                source: e,
            })?;
        info!("JWT: RS256 authentication enabled");
        JwtValidator::with_rs256(&public_key).map_err(ServerError::Auth)?
    } else {
        unreachable!("validate() ensures a JWT key source is configured")
    };

    // Convert config types for jb-auth
    let rate_limiter_factory = RateLimiterFactory::new(jb_auth::RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window_secs: config.rate_limit.window_secs,
    });

    // Create connection registry and metrics collector
    let registry = ConnectionRegistry::new();
    let metrics = Metrics::new();

    // Create notification router over the registry
    let router = NotificationRouter::new(
        registry.clone(),
        RouterConfig {
            send_timeout_secs: config.websocket.send_timeout_secs,
            max_concurrent_pushes: config.broadcast.max_concurrent_pushes,
        },
        metrics.clone(),
    );

    // Create shutdown coordinator
    let shutdown = ShutdownCoordinator::new();

    // Create connection config for jb-ws
    let connection_config = ConnectionConfig {
        send_buffer_size: config.websocket.send_buffer_size,
        heartbeat_interval_secs: config.websocket.heartbeat_interval_secs,
        heartbeat_timeout_secs: config.websocket.heartbeat_timeout_secs,
    };

    // Build application state
    let app_state = AppState {
        jwt_validator: Arc::new(jwt_validator),
        rate_limiter_factory,
        registry,
        router,
        metrics,
        shutdown: shutdown.clone(),
        config: connection_config,
        max_connections: config.server.max_connections,
    };

    // Build router
    let app = build_router(app_state);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Graceful shutdown complete");
        })
        .await?;

    Ok(())
}
