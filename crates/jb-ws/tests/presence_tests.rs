mod common;

use common::{
    jwt_helper::{create_expired_token, create_malformed_token, create_test_token},
    test_client::WsTestClient,
    test_server::{TEST_JWT_SECRET, TestServerConfig, create_test_server,
        create_test_server_with_config},
};

use jb_core::Role;
use tokio::time::{Duration, sleep};

#[tokio::test]
async fn given_authenticated_connect_when_registered_then_user_is_online() {
    // Given
    let test_server = create_test_server();

    // When
    let _client =
        WsTestClient::connect(&test_server.server, "user-1", "seeker", TEST_JWT_SECRET).await;

    // Then
    let registry = &test_server.app_state.registry;
    assert!(registry.is_online("user-1").await);
    assert_eq!(registry.count_all().await, 1);

    let entry = registry.get("user-1").await.expect("entry should exist");
    assert_eq!(entry.role, Role::Seeker);
}

#[tokio::test]
async fn given_connected_client_when_closed_then_unregistered() {
    // Given
    let test_server = create_test_server();
    let client =
        WsTestClient::connect(&test_server.server, "user-1", "employer", TEST_JWT_SECRET).await;
    assert!(test_server.app_state.registry.is_online("user-1").await);

    // When
    client.close().await;

    // Give server time to process disconnect
    sleep(Duration::from_millis(100)).await;

    // Then
    assert!(!test_server.app_state.registry.is_online("user-1").await);
    assert_eq!(test_server.app_state.registry.count_all().await, 0);
}

#[tokio::test]
async fn given_reconnect_when_registered_then_single_entry_survives() {
    // Given - user-1 already connected
    let test_server = create_test_server();
    let _first =
        WsTestClient::connect(&test_server.server, "user-1", "seeker", TEST_JWT_SECRET).await;
    let first_id = test_server
        .app_state
        .registry
        .get("user-1")
        .await
        .unwrap()
        .connection_id;

    // When - the same user connects again
    let _second =
        WsTestClient::connect(&test_server.server, "user-1", "seeker", TEST_JWT_SECRET).await;

    // Then - exactly one entry, and it is the replacement
    let registry = &test_server.app_state.registry;
    assert_eq!(registry.count_all().await, 1);
    assert!(registry.is_online("user-1").await);
    assert_ne!(registry.get("user-1").await.unwrap().connection_id, first_id);
}

#[tokio::test]
async fn given_reconnect_when_old_teardown_settles_then_replacement_still_online() {
    // Given - a replaced connection whose teardown lags behind
    let test_server = create_test_server();
    let _first =
        WsTestClient::connect(&test_server.server, "user-1", "seeker", TEST_JWT_SECRET).await;
    let _second =
        WsTestClient::connect(&test_server.server, "user-1", "seeker", TEST_JWT_SECRET).await;

    // When - the superseded connection finishes closing
    sleep(Duration::from_millis(200)).await;

    // Then - the replacement was not evicted by the old teardown
    assert!(test_server.app_state.registry.is_online("user-1").await);
    assert_eq!(test_server.app_state.registry.count_all().await, 1);
}

#[tokio::test]
async fn given_server_at_limit_when_new_connection_then_rejected_503() {
    // Given - Server with limit of 2 connections
    let config = TestServerConfig::with_strict_limits();
    let test_server = create_test_server_with_config(config);

    let _client1 =
        WsTestClient::connect(&test_server.server, "user-1", "seeker", TEST_JWT_SECRET).await;
    let _client2 =
        WsTestClient::connect(&test_server.server, "user-2", "seeker", TEST_JWT_SECRET).await;

    // When - Try to create 3rd connection
    let response = test_server
        .server
        .get_websocket("/ws")
        .add_header(
            "Authorization",
            format!(
                "Bearer {}",
                create_test_token("user-3", "seeker", TEST_JWT_SECRET)
            ),
        )
        .await;

    // Then - Rejected with 503
    response.assert_status_service_unavailable();
}

#[tokio::test]
async fn given_limit_reached_when_one_disconnects_then_new_can_connect() {
    // Given - Server at its 2-connection limit
    let config = TestServerConfig::with_strict_limits();
    let test_server = create_test_server_with_config(config);

    let client1 =
        WsTestClient::connect(&test_server.server, "user-1", "seeker", TEST_JWT_SECRET).await;
    let _client2 =
        WsTestClient::connect(&test_server.server, "user-2", "seeker", TEST_JWT_SECRET).await;

    // When - One client disconnects
    client1.close().await;
    sleep(Duration::from_millis(100)).await;

    // Then - New connection succeeds (slot freed)
    let client3 =
        WsTestClient::connect(&test_server.server, "user-3", "seeker", TEST_JWT_SECRET).await;
    client3.close().await;
}

// =========================================================================
// Authentication Gate
// =========================================================================

#[tokio::test]
async fn given_missing_auth_header_when_connect_then_401_and_no_registration() {
    let test_server = create_test_server();

    let response = test_server.server.get_websocket("/ws").await;

    response.assert_status_unauthorized();
    assert_eq!(test_server.app_state.registry.count_all().await, 0);
}

#[tokio::test]
async fn given_expired_token_when_connect_then_401_and_no_registration() {
    let test_server = create_test_server();

    let response = test_server
        .server
        .get_websocket("/ws")
        .add_header(
            "Authorization",
            format!(
                "Bearer {}",
                create_expired_token("user-1", "seeker", TEST_JWT_SECRET)
            ),
        )
        .await;

    response.assert_status_unauthorized();
    assert_eq!(test_server.app_state.registry.count_all().await, 0);
}

#[tokio::test]
async fn given_malformed_token_when_connect_then_401() {
    let test_server = create_test_server();

    let response = test_server
        .server
        .get_websocket("/ws")
        .add_header("Authorization", format!("Bearer {}", create_malformed_token()))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn given_unknown_role_claim_when_connect_then_401_and_no_registration() {
    let test_server = create_test_server();

    let response = test_server
        .server
        .get_websocket("/ws")
        .add_header(
            "Authorization",
            format!(
                "Bearer {}",
                create_test_token("user-1", "superuser", TEST_JWT_SECRET)
            ),
        )
        .await;

    response.assert_status_unauthorized();
    assert_eq!(test_server.app_state.registry.count_all().await, 0);
}
