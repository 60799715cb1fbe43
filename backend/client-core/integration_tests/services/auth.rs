use crate::helpers::{FRESH_COOKIE, authenticated_gateway, gateway_for, mount_refresh_success};

use client_core::AuthService;
use common::RedactedSecret;
use models::{LoginPayload, PasswordChange, Role, SignupPayload, Upload};

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> serde_json::Value {
    json!({
        "id": "u-1",
        "email": "ada@example.com",
        "fullName": "Ada Lovelace",
        "role": "ORGANIZER",
        "profilePic": null
    })
}

/// **VALUE**: A successful login yields the user projection and installs the session cookie.
#[tokio::test]
async fn given_valid_credentials_when_login_then_user_returned() {
    // GIVEN: Login that checks the body and sets the session cookie
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter2" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=fresh; Path=/; HttpOnly")
                .set_body_json(json!({ "success": true, "user": user_json() })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/me"))
        .and(header("cookie", FRESH_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })))
        .expect(1)
        .mount(&server)
        .await;
    let auth = AuthService::new(gateway_for(&server));

    // WHEN: Logging in, then asking who we are
    let response = auth
        .login(&LoginPayload::new("ada@example.com", "hunter2"))
        .await
        .unwrap();
    let me = auth.me().await.unwrap();

    // THEN: Both report the same user; the cookie carried the session
    assert!(response.success);
    assert_eq!(response.user.as_ref().map(|u| u.role), Some(Role::Organizer));
    assert_eq!(me.full_name, "Ada Lovelace");
}

/// **VALUE**: A rejected login surfaces the backend's message and never refreshes.
///
/// **BUG THIS CATCHES**: Would catch login losing its refresh exemption.
#[tokio::test]
async fn given_wrong_password_when_login_then_rejection_without_refresh() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::ZERO, 0).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;
    let auth = AuthService::new(gateway_for(&server));

    let err = auth
        .login(&LoginPayload::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.backend_message().as_deref(), Some("Invalid credentials"));
}

/// **VALUE**: Signup is also exempt from refresh.
#[tokio::test]
async fn given_duplicate_email_when_signup_then_error_without_refresh() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::ZERO, 0).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_json(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "password": "hunter2",
            "role": "PARTICIPANT"
        })))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Email already in use" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let auth = AuthService::new(gateway_for(&server));

    let err = auth
        .signup(&SignupPayload {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: RedactedSecret::from("hunter2"),
            role: Role::Participant,
        })
        .await
        .unwrap_err();

    assert_eq!(err.backend_message().as_deref(), Some("Email already in use"));
}

/// **VALUE**: The reset token travels in the query string, the new password in the body.
#[tokio::test]
async fn given_reset_token_when_resetting_then_token_in_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/verify-reset"))
        .and(query_param("token", "abc123"))
        .and(body_json(json!({ "newPassword": "n3w-pass" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Password reset" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let auth = AuthService::new(gateway_for(&server));

    let message = auth
        .reset_password(&RedactedSecret::from("abc123"), &RedactedSecret::from("n3w-pass"))
        .await
        .unwrap();

    assert!(message.success);
    assert_eq!(message.message.as_deref(), Some("Password reset"));
}

#[tokio::test]
async fn given_session_when_updating_password_then_both_fields_sent() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/user/update-password"))
        .and(header("cookie", FRESH_COOKIE))
        .and(body_json(json!({ "oldPassword": "old", "newPassword": "new" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    let auth = AuthService::new(gateway);

    let message = auth
        .update_password(&PasswordChange {
            old_password: RedactedSecret::from("old"),
            new_password: RedactedSecret::from("new"),
        })
        .await
        .unwrap();

    assert!(message.success);
}

/// **VALUE**: Profile pictures go up as a multipart file under `profilePic`.
#[tokio::test]
async fn given_picture_when_updating_profile_pic_then_multipart_upload() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/user/update-profile-pic"))
        .and(body_string_contains("name=\"profilePic\""))
        .and(body_string_contains("filename=\"me.png\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "profilePic": "https://cdn/me.png" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let auth = AuthService::new(gateway);

    let body = auth
        .update_profile_pic(Upload::new("me.png", "image/png", b"png-bytes".to_vec()))
        .await
        .unwrap();

    assert_eq!(body["profilePic"], "https://cdn/me.png");
}

#[tokio::test]
async fn given_session_when_logging_out_then_acknowledged() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/logout"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Logged out" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let message = AuthService::new(gateway).logout().await.unwrap();

    assert_eq!(message.message.as_deref(), Some("Logged out"));
}
