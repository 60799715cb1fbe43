use crate::helpers::{REFRESH_PATH, gateway_for, mount_refresh_success};

use client_core::ApiRequest;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: A skip-refresh request that gets 401 fails immediately without a refresh.
///
/// **WHY THIS MATTERS**: A 401 from the login endpoint means wrong password. Refreshing
/// and replaying it would turn a clear error into a confusing session-expired message.
///
/// **BUG THIS CATCHES**: Would catch the skip marker being ignored (refresh `expect(0)`).
#[tokio::test]
async fn given_skip_refresh_request_when_401_then_error_propagates_without_refresh() {
    // GIVEN: Login rejects credentials; refresh must never be called
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::ZERO, 0).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let gateway = gateway_for(&server);

    // WHEN: Sending an exempt request
    let result = gateway
        .send(ApiRequest::post("auth/login").skip_refresh())
        .await;

    // THEN: The 401 reaches the caller untouched
    let err = result.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.backend_message().as_deref(), Some("Invalid credentials"));
    assert_eq!(gateway.refresh_episodes(), 0);
}

/// **VALUE**: Non-401 failures pass through with status and body, without retries.
#[tokio::test]
async fn given_server_error_when_sending_then_passed_through_once() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::ZERO, 0).await;
    Mock::given(method("GET"))
        .and(path("/api/events/all"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;
    let gateway = gateway_for(&server);

    let err = gateway
        .send(ApiRequest::get("events/all"))
        .await
        .unwrap_err();

    assert_eq!(err.http_status().map(|s| s.as_u16()), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

/// **VALUE**: Connection failures surface as transport errors, not refresh failures.
#[tokio::test]
async fn given_unreachable_backend_when_sending_then_transport_error() {
    // GIVEN: A server that is shut down before the request
    let server = MockServer::start().await;
    let gateway = gateway_for(&server);
    drop(server);

    // WHEN: Sending
    let err = gateway
        .send(ApiRequest::get("events/all"))
        .await
        .unwrap_err();

    // THEN: Transport error flagged as a connection failure
    match err {
        client_core::GatewayError::Transport { is_connection, .. } => assert!(is_connection),
        other => panic!("Expected Transport error, got {other}"),
    }
}

#[test]
fn refresh_path_constant_matches_default_config() {
    let config = client_core::GatewayConfig::default();
    assert!(REFRESH_PATH.ends_with(&config.refresh_path));
}
