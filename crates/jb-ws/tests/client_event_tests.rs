mod common;

use common::{
    test_client::WsTestClient,
    test_server::{TEST_JWT_SECRET, TestServerConfig, create_test_server,
        create_test_server_with_config},
};

use serde_json::json;
use tokio::time::{Duration, sleep};

#[tokio::test]
async fn given_job_applied_event_when_emitted_then_employer_notified() {
    // Given - a connected employer and a connected seeker
    let test_server = create_test_server();
    let mut employer =
        WsTestClient::connect(&test_server.server, "emp-1", "employer", TEST_JWT_SECRET).await;
    let mut seeker =
        WsTestClient::connect(&test_server.server, "seek-1", "seeker", TEST_JWT_SECRET).await;

    // When - the seeker's client emits a job_applied event
    seeker
        .send_event(&json!({
            "event": "job_applied",
            "data": {
                "employerId": "emp-1",
                "applicantName": "Jane Doe",
                "jobTitle": "Backend Engineer",
                "applicationId": "app-1"
            }
        }))
        .await;

    // Then - the employer receives the pre-shaped notification
    let envelope = employer.receive_envelope().await;
    assert_eq!(envelope["event"], "notification");
    assert_eq!(envelope["notification"]["kind"], "job_application");
    assert_eq!(
        envelope["notification"]["message"],
        "Jane Doe applied for Backend Engineer"
    );
    // Raw event data passes through unmodified
    assert_eq!(envelope["notification"]["data"]["applicationId"], "app-1");

    employer.close().await;
    seeker.close().await;
}

#[tokio::test]
async fn given_status_update_event_when_emitted_then_applicant_notified() {
    // Given
    let test_server = create_test_server();
    let mut applicant =
        WsTestClient::connect(&test_server.server, "seek-1", "seeker", TEST_JWT_SECRET).await;
    let mut employer =
        WsTestClient::connect(&test_server.server, "emp-1", "employer", TEST_JWT_SECRET).await;

    // When - the employer's client reports a status change
    employer
        .send_event(&json!({
            "event": "application_status_updated",
            "data": {
                "applicantId": "seek-1",
                "jobTitle": "Backend Engineer",
                "status": "accepted"
            }
        }))
        .await;

    // Then
    let envelope = applicant.receive_envelope().await;
    assert_eq!(envelope["notification"]["kind"], "application_update");
    assert_eq!(
        envelope["notification"]["message"],
        "Your application for Backend Engineer has been accepted"
    );

    applicant.close().await;
    employer.close().await;
}

#[tokio::test]
async fn given_interview_event_when_emitted_then_applicant_notified() {
    let test_server = create_test_server();
    let mut applicant =
        WsTestClient::connect(&test_server.server, "seek-1", "seeker", TEST_JWT_SECRET).await;
    let mut employer =
        WsTestClient::connect(&test_server.server, "emp-1", "employer", TEST_JWT_SECRET).await;

    employer
        .send_event(&json!({
            "event": "interview_scheduled",
            "data": {
                "applicantId": "seek-1",
                "jobTitle": "Backend Engineer",
                "date": "2026-08-20"
            }
        }))
        .await;

    let envelope = applicant.receive_envelope().await;
    assert_eq!(envelope["notification"]["kind"], "interview");
    assert_eq!(
        envelope["notification"]["message"],
        "Interview scheduled for Backend Engineer on 2026-08-20"
    );

    applicant.close().await;
    employer.close().await;
}

#[tokio::test]
async fn given_malformed_event_when_emitted_then_connection_survives() {
    // Given
    let test_server = create_test_server();
    let mut employer =
        WsTestClient::connect(&test_server.server, "emp-1", "employer", TEST_JWT_SECRET).await;
    let mut seeker =
        WsTestClient::connect(&test_server.server, "seek-1", "seeker", TEST_JWT_SECRET).await;

    // When - garbage, then a valid event on the same connection
    seeker.send_text("this is not json").await;
    seeker
        .send_event(&json!({"event": "user_typing", "data": {}}))
        .await;
    seeker
        .send_event(&json!({
            "event": "job_applied",
            "data": {
                "employerId": "emp-1",
                "applicantName": "Jane Doe",
                "jobTitle": "Backend Engineer"
            }
        }))
        .await;

    // Then - the valid event still routes
    let envelope = employer.receive_envelope().await;
    assert_eq!(envelope["notification"]["kind"], "job_application");
    assert!(test_server.app_state.registry.is_online("seek-1").await);

    employer.close().await;
    seeker.close().await;
}

#[tokio::test]
async fn given_offline_target_when_event_emitted_then_sender_unaffected() {
    // Given - nobody named emp-ghost is connected
    let test_server = create_test_server();
    let mut seeker =
        WsTestClient::connect(&test_server.server, "seek-1", "seeker", TEST_JWT_SECRET).await;

    // When
    seeker
        .send_event(&json!({
            "event": "job_applied",
            "data": {
                "employerId": "emp-ghost",
                "applicantName": "Jane Doe",
                "jobTitle": "Backend Engineer"
            }
        }))
        .await;
    sleep(Duration::from_millis(100)).await;

    // Then - fire-and-forget: the sender stays connected
    assert!(test_server.app_state.registry.is_online("seek-1").await);

    seeker.close().await;
}

#[tokio::test]
async fn given_event_flood_when_rate_limited_then_connection_closed() {
    // Given - strict 2-events-per-second limit
    let config = TestServerConfig::with_strict_rate_limits();
    let test_server = create_test_server_with_config(config);
    let mut seeker =
        WsTestClient::connect(&test_server.server, "seek-1", "seeker", TEST_JWT_SECRET).await;

    // When - a quick burst past the quota (small enough that every send
    // lands before the server's close round-trips)
    for _ in 0..4 {
        seeker
            .send_event(&json!({
                "event": "job_applied",
                "data": {
                    "employerId": "emp-1",
                    "applicantName": "Jane Doe",
                    "jobTitle": "Backend Engineer"
                }
            }))
            .await;
    }
    sleep(Duration::from_millis(200)).await;

    // Then - the server tore the connection down and unregistered it
    assert!(!test_server.app_state.registry.is_online("seek-1").await);
}
