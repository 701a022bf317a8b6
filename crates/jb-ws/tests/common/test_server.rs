#![allow(dead_code)]

use jb_auth::{JwtValidator, RateLimitConfig, RateLimiterFactory};
use jb_ws::{
    AppState, ConnectionConfig, ConnectionRegistry, Metrics, NotificationRouter, RouterConfig,
    ShutdownCoordinator,
};

use std::sync::Arc;

use axum::{Router, routing::get};
use axum_test::TestServer;

/// Default JWT secret for all tests (HS256 requires at least 32 bytes)
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-integration-tests-min-32-bytes-long";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_connections: usize,
    pub send_timeout_secs: u64,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_connections: 100,
            send_timeout_secs: 1,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 60,
        }
    }
}

impl TestServerConfig {
    /// Create config with strict connection limits (for limit tests)
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections: 2,
            ..Default::default()
        }
    }

    /// Create config with strict rate limits (for rate limit tests)
    pub fn with_strict_rate_limits() -> Self {
        Self {
            rate_limit_max_requests: 2,
            rate_limit_window_secs: 1,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

/// Build the Axum Router with AppState
fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let jwt_validator = Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET));

    let rate_limiter_factory = RateLimiterFactory::new(RateLimitConfig {
        max_requests: config.rate_limit_max_requests,
        window_secs: config.rate_limit_window_secs,
    });

    let registry = ConnectionRegistry::new();
    let metrics = Metrics::default();

    let router = NotificationRouter::new(
        registry.clone(),
        RouterConfig {
            send_timeout_secs: config.send_timeout_secs,
            max_concurrent_pushes: 8,
        },
        metrics.clone(),
    );

    let shutdown = ShutdownCoordinator::new();

    let app_state = AppState {
        jwt_validator,
        rate_limiter_factory,
        registry,
        router,
        metrics,
        shutdown,
        config: ConnectionConfig::default(),
        max_connections: config.max_connections,
    };

    let app = Router::new()
        .route("/ws", get(jb_ws::handler))
        .with_state(app_state.clone());

    (app, app_state)
}
