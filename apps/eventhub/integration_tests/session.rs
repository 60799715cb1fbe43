use eventhub::session::{sign_in, sign_out, sync_current_user};
use eventhub::state::{AppState, StateCommand};

use client_core::{AuthService, Gateway, GatewayConfig, UserStore};
use models::{LoginPayload, Role, User};

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests for AppState + client-core session handling
// ============================================================================

fn user_json() -> serde_json::Value {
    json!({
        "id": "u-9",
        "email": "lee@example.com",
        "fullName": "Lee Admin",
        "role": "ADMIN"
    })
}

fn stored_user() -> User {
    User {
        id: String::from("u-9"),
        email: String::from("lee@example.com"),
        full_name: String::from("Lee Admin"),
        phone: None,
        role: Role::Admin,
        profile_pic: None,
    }
}

fn auth_for(server: &MockServer) -> AuthService {
    let config = GatewayConfig::new(format!("{}/api", server.uri()));
    AuthService::new(Arc::new(Gateway::new(&config).unwrap()))
}

async fn mount_me(server: &MockServer, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() }))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({ "message": "jwt expired" }))
    };
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_refresh(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

/// **VALUE**: A live session populates the projection and the stored copy.
#[tokio::test]
async fn given_live_session_when_syncing_then_user_stored() {
    // GIVEN: Backend that knows the user
    let server = MockServer::start().await;
    mount_me(&server, 200).await;
    let dir = TempDir::new().unwrap();
    let state = AppState::with_store(UserStore::new(dir.path()));

    // WHEN: Syncing
    let synced = sync_current_user(&state, &auth_for(&server)).await.unwrap();

    // THEN: Same user in memory and on disk
    assert_eq!(synced.map(|u| u.role), Some(Role::Admin));
    assert_eq!(
        UserStore::new(dir.path()).load().unwrap().map(|u| u.id),
        Some(String::from("u-9"))
    );
}

/// **VALUE**: When the refresh fails, the stale stored user is dropped.
///
/// **WHY THIS MATTERS**: A restored user whose session is gone would keep showing
/// signed-in screens that fail on every action.
///
/// **BUG THIS CATCHES**: Would catch RefreshFailed being treated as a transient error
/// that keeps the last known user.
#[tokio::test]
async fn given_dead_session_when_syncing_then_stored_user_cleared() {
    // GIVEN: A stored user, me -> 401, refresh -> 401
    let server = MockServer::start().await;
    mount_me(&server, 401).await;
    mount_refresh(&server, 401).await;
    let dir = TempDir::new().unwrap();
    UserStore::new(dir.path()).save(&stored_user()).unwrap();
    let state = AppState::with_store(UserStore::new(dir.path()));
    state.restore().await.unwrap();
    assert!(state.is_signed_in().await);

    // WHEN: Syncing
    let synced = sync_current_user(&state, &auth_for(&server)).await.unwrap();

    // THEN: Signed out everywhere
    assert!(synced.is_none());
    assert!(!state.is_signed_in().await);
    assert!(UserStore::new(dir.path()).load().unwrap().is_none());
}

/// **VALUE**: A backend outage is reported but keeps the last known user.
#[tokio::test]
async fn given_backend_error_when_syncing_then_user_kept() {
    let server = MockServer::start().await;
    mount_me(&server, 502).await;
    let state = AppState::new();
    state
        .update(StateCommand::SetUser(stored_user()))
        .await
        .unwrap();

    let result = sync_current_user(&state, &auth_for(&server)).await;

    assert!(result.is_err());
    assert!(state.is_signed_in().await);
}

#[tokio::test]
async fn given_valid_credentials_when_signing_in_then_state_updated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "user": user_json() })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let state = AppState::new();

    let user = sign_in(
        &state,
        &auth_for(&server),
        &LoginPayload::new("lee@example.com", "pw"),
    )
    .await
    .unwrap();

    assert_eq!(user.full_name, "Lee Admin");
    assert!(state.is_signed_in().await);
}

/// **VALUE**: A rejected login shows the backend's wording and stays signed out.
#[tokio::test]
async fn given_rejected_login_when_signing_in_then_backend_message_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "message": "Account not verified" })),
        )
        .mount(&server)
        .await;
    let state = AppState::new();

    let err = sign_in(
        &state,
        &auth_for(&server),
        &LoginPayload::new("lee@example.com", "pw"),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Account not verified"));
    assert!(!state.is_signed_in().await);
}

/// **VALUE**: Signing out clears local state even when the session already expired.
#[tokio::test]
async fn given_expired_session_when_signing_out_then_cleared_without_error() {
    let server = MockServer::start().await;
    mount_refresh(&server, 401).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let state = AppState::new();
    state
        .update(StateCommand::SetUser(stored_user()))
        .await
        .unwrap();

    sign_out(&state, &auth_for(&server)).await.unwrap();

    assert!(!state.is_signed_in().await);
}
