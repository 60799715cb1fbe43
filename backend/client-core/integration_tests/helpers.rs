//! Test helpers for gateway integration tests.
//!
//! The mock backend models the session the way the real one does: the
//! refresh endpoint sets a `session` cookie, and protected endpoints answer
//! 401 until a request carries that cookie.

use client_core::{Gateway, GatewayConfig};

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REFRESH_PATH: &str = "/api/auth/refresh";
pub const FRESH_COOKIE: &str = "session=fresh";

/// Long enough that every concurrent caller sees its 401 while the episode is open.
pub const REFRESH_DELAY: Duration = Duration::from_millis(300);

pub fn config_for(server: &MockServer) -> GatewayConfig {
    GatewayConfig::new(format!("{}/api", server.uri()))
}

pub fn gateway_for(server: &MockServer) -> Arc<Gateway> {
    Arc::new(Gateway::new(&config_for(server)).expect("Failed to build gateway"))
}

/// Refresh endpoint that succeeds after `delay` and sets the fresh cookie.
pub async fn mount_refresh_success(server: &MockServer, delay: Duration, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=fresh; Path=/; HttpOnly")
                .set_body_json(serde_json::json!({ "success": true }))
                .set_delay(delay),
        )
        .expect(expected_calls)
        .named("refresh (success)")
        .mount(server)
        .await;
}

/// Refresh endpoint that fails with `status` after `delay`.
pub async fn mount_refresh_failure(
    server: &MockServer,
    status: u16,
    delay: Duration,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path(REFRESH_PATH))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(serde_json::json!({ "message": "Refresh token expired" }))
                .set_delay(delay),
        )
        .expect(expected_calls)
        .named("refresh (failure)")
        .mount(server)
        .await;
}

/// GET endpoint that returns `body` with the fresh cookie and 401 without it.
pub async fn mount_session_protected(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(header("cookie", FRESH_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(1)
        .named("protected (authorized)")
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "message": "jwt expired" })),
        )
        .named("protected (expired)")
        .mount(server)
        .await;
}

/// GET endpoint that always answers 401, whatever the cookie.
pub async fn mount_always_unauthorized(server: &MockServer, endpoint: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({ "message": "jwt expired" })),
        )
        .expect(expected_calls)
        .named("protected (always expired)")
        .mount(server)
        .await;
}

/// Gateway whose session is already fresh, for service tests that do not
/// exercise the refresh path.
pub async fn authenticated_gateway(server: &MockServer) -> Arc<Gateway> {
    mount_refresh_success(server, Duration::ZERO, 1).await;
    let gateway = gateway_for(server);
    gateway
        .refresh_session()
        .await
        .expect("Initial refresh should succeed");
    gateway
}
