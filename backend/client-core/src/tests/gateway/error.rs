use crate::GatewayError;
use crate::gateway::RefreshRejection;

use common::HttpStatusCode;

use std::time::Duration;

/// **VALUE**: Verifies that a refresh failure is classified as an ended session.
///
/// **WHY THIS MATTERS**: Callers branch on `is_session_expired()` to drop the stored user.
/// A refresh failure that looks like an ordinary 401 would leave a stale user on screen.
#[test]
fn given_refresh_rejection_when_converted_then_reports_session_expired() {
    // GIVEN: The refresh endpoint rejected the session
    let rejection = RefreshRejection::rejected(HttpStatusCode(401), "no refresh cookie");

    // WHEN: Converting to a gateway error
    let err = GatewayError::refresh_failed(rejection);

    // THEN: Session expired, status kept, not a plain 401
    assert!(err.is_session_expired());
    assert!(!err.is_unauthorized());
    assert_eq!(err.http_status(), Some(HttpStatusCode(401)));
    assert!(err.to_string().contains("Session Refresh Error"));
    assert!(err.to_string().contains("error.rs"));
}

#[test]
fn given_timed_out_rejection_when_converted_then_flag_survives() {
    let err = GatewayError::refresh_failed(RefreshRejection::timed_out(Duration::from_millis(250)));

    match err {
        GatewayError::RefreshFailed {
            timed_out, message, ..
        } => {
            assert!(timed_out);
            assert!(message.contains("250ms"));
        }
        other => panic!("Expected RefreshFailed, got {other}"),
    }
}

#[test]
fn given_non_json_body_when_reading_backend_message_then_none() {
    let err = GatewayError::status(HttpStatusCode(502), "<html>Bad Gateway</html>");

    assert_eq!(err.backend_message(), None);
    assert_eq!(err.http_status(), Some(HttpStatusCode(502)));
}
