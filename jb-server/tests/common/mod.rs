#![allow(dead_code)]

use jb_auth::{JwtValidator, RateLimiterFactory};
use jb_server::build_router;
use jb_ws::{
    AppState, ConnectionConfig, ConnectionRegistry, Metrics, NotificationRouter, RouterConfig,
    ShutdownCoordinator,
};

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum_test::TestServer;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

/// Default JWT secret for all tests (HS256 requires at least 32 bytes)
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-server-tests-min-32-bytes-long";

#[derive(Debug, Serialize)]
struct TestJwtClaims {
    sub: String,
    role: String,
    exp: u64,
    iat: u64,
}

/// Create a valid JWT token for the given role
pub fn create_test_token(user_id: &str, role: &str) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs();

    let claims = TestJwtClaims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("Failed to encode JWT")
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

/// Create a TestServer running the full application router
pub fn create_test_server() -> TestServerWithState {
    let registry = ConnectionRegistry::new();
    let metrics = Metrics::default();

    let router = NotificationRouter::new(
        registry.clone(),
        RouterConfig {
            send_timeout_secs: 1,
            max_concurrent_pushes: 8,
        },
        metrics.clone(),
    );

    let app_state = AppState {
        jwt_validator: Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET)),
        rate_limiter_factory: RateLimiterFactory::default(),
        registry,
        router,
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::default(),
        max_connections: 100,
    };

    let app = build_router(app_state.clone());
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}
