use crate::helpers::{
    REFRESH_DELAY, config_for, gateway_for, mount_always_unauthorized, mount_refresh_failure,
    mount_refresh_success, mount_session_protected,
};

use client_core::{ApiRequest, Gateway, GatewayError};

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde_json::{Value, json};
use wiremock::MockServer;

const EVENTS_PATH: &str = "/api/events/all";
const PROFILE_PATH: &str = "/api/user/me";
const DASHBOARD_PATH: &str = "/api/events/dashboard/analysis";

async fn fire_concurrently(gateway: &Arc<Gateway>, paths: &[&str]) -> Vec<Result<Value, GatewayError>> {
    let calls = paths.iter().map(|p| {
        let gateway = Arc::clone(gateway);
        let request = ApiRequest::get(p.trim_start_matches("/api/"));
        tokio::spawn(async move { gateway.send_json::<Value>(request).await })
    });

    join_all(calls)
        .await
        .into_iter()
        .map(|joined| joined.expect("request task panicked"))
        .collect()
}

/// **VALUE**: Three pages fetch at once, all see an expired session, one refresh repairs
/// all three, and every caller gets its normal payload.
///
/// **WHY THIS MATTERS**: This is the reason the coordinator exists. Without it each caller
/// issues its own refresh, and concurrent refreshes can rotate the cookie out from under
/// each other.
///
/// **BUG THIS CATCHES**: Would catch a second refresh call (mock `expect(1)` fails on drop),
/// a queued request never released, or a replay that is skipped.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_expired_requests_when_refresh_succeeds_then_one_refresh_and_all_replayed() {
    // GIVEN: Three protected endpoints and a slow, successful refresh
    let server = MockServer::start().await;
    mount_refresh_success(&server, REFRESH_DELAY, 1).await;
    mount_session_protected(&server, EVENTS_PATH, json!({ "data": "events" })).await;
    mount_session_protected(&server, PROFILE_PATH, json!({ "data": "profile" })).await;
    mount_session_protected(&server, DASHBOARD_PATH, json!({ "data": "dashboard" })).await;
    let gateway = gateway_for(&server);

    // WHEN: All three fire at once
    let results = fire_concurrently(&gateway, &[EVENTS_PATH, PROFILE_PATH, DASHBOARD_PATH]).await;

    // THEN: Each caller gets its own payload, with exactly one episode
    let payloads: Vec<String> = results
        .into_iter()
        .map(|r| r.expect("request should recover")["data"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(payloads, vec!["events", "profile", "dashboard"]);
    assert_eq!(gateway.refresh_episodes(), 1);
    assert!(!gateway.is_refreshing());
    assert_eq!(gateway.queued_requests(), 0);
}

/// **VALUE**: A replay that is still unauthorized is surfaced, not retried a third time.
///
/// **WHY THIS MATTERS**: If the backend keeps rejecting the session after a successful
/// refresh (user deactivated, clock skew), an uncapped retry loops forever.
///
/// **BUG THIS CATCHES**: Would catch the replayed request losing its retried marker.
#[tokio::test]
async fn given_replay_still_unauthorized_when_sending_then_surfaces_401_after_one_retry() {
    // GIVEN: Endpoint that always 401s; refresh succeeds
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::ZERO, 1).await;
    mount_always_unauthorized(&server, PROFILE_PATH, 2).await;
    let gateway = gateway_for(&server);

    // WHEN: Sending once
    let result = gateway.send(ApiRequest::get("user/me")).await;

    // THEN: Original + one replay, then a plain 401 error
    let err = result.unwrap_err();
    assert!(err.is_unauthorized(), "Expected 401 status error, got {err}");
    assert!(!err.is_session_expired());
    assert_eq!(err.backend_message().as_deref(), Some("jwt expired"));
}

/// **VALUE**: Queued requests whose replay fails do not open a second episode.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_requests_when_replays_fail_then_no_second_refresh() {
    // GIVEN: Three callers on an always-401 endpoint (6 hits: original + replay each)
    let server = MockServer::start().await;
    mount_refresh_success(&server, REFRESH_DELAY, 1).await;
    mount_always_unauthorized(&server, EVENTS_PATH, 6).await;
    let gateway = gateway_for(&server);

    // WHEN: All three fire at once
    let results = fire_concurrently(&gateway, &[EVENTS_PATH, EVENTS_PATH, EVENTS_PATH]).await;

    // THEN: Every caller sees a plain 401 and only one episode ran
    for result in results {
        assert!(result.unwrap_err().is_unauthorized());
    }
    assert_eq!(gateway.refresh_episodes(), 1);
}

/// **VALUE**: A failed refresh rejects every waiter in the batch, and none are replayed.
///
/// **WHY THIS MATTERS**: Refresh failure means the session is over. Replaying would only
/// produce more 401s and mask the real cause from the UI.
///
/// **BUG THIS CATCHES**: Would catch waiters being released with Ok on failure, or
/// protected endpoints hit again after the failed episode (mock `expect(3)`).
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_concurrent_expired_requests_when_refresh_fails_then_all_rejected() {
    // GIVEN: Refresh answers 401 after a delay
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 401, REFRESH_DELAY, 1).await;
    mount_always_unauthorized(&server, EVENTS_PATH, 3).await;
    let gateway = gateway_for(&server);

    // WHEN: Three callers fire at once
    let results = fire_concurrently(&gateway, &[EVENTS_PATH, EVENTS_PATH, EVENTS_PATH]).await;

    // THEN: All three get the refresh failure with its status
    for result in results {
        let err = result.unwrap_err();
        assert!(err.is_session_expired(), "Expected RefreshFailed, got {err}");
        assert_eq!(err.http_status().map(|s| s.as_u16()), Some(401));
    }
    assert!(!gateway.is_refreshing());
}

/// **VALUE**: After an episode settles, the next expiry opens a fresh episode.
///
/// **BUG THIS CATCHES**: Would catch the in-progress flag staying set after a failure,
/// which parks every later 401 behind a refresh that never comes.
#[tokio::test]
async fn given_failed_episode_when_next_request_expires_then_new_refresh_issued() {
    // GIVEN: Refresh always fails
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 500, Duration::ZERO, 2).await;
    mount_always_unauthorized(&server, EVENTS_PATH, 2).await;
    let gateway = gateway_for(&server);

    // WHEN: Two independent requests, one after the other
    let first = gateway.send(ApiRequest::get("events/all")).await;
    assert!(!gateway.is_refreshing(), "Flag must clear after the first episode");
    let second = gateway.send(ApiRequest::get("events/all")).await;

    // THEN: Both episodes ran
    assert!(first.unwrap_err().is_session_expired());
    assert!(second.unwrap_err().is_session_expired());
    assert_eq!(gateway.refresh_episodes(), 2);
}

/// **VALUE**: A hung refresh is bounded; the leader and every waiter fail with `timed_out`.
///
/// **WHY THIS MATTERS**: Without a bound, one stuck refresh call stalls every request
/// in the application indefinitely.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_hung_refresh_when_timeout_elapses_then_batch_fails_with_timeout() {
    // GIVEN: Refresh that takes far longer than the configured bound
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::from_secs(2), 1).await;
    mount_always_unauthorized(&server, EVENTS_PATH, 2).await;
    let config = config_for(&server)
        .with_refresh_timeout(Duration::from_millis(200))
        .with_queue_timeout(Duration::from_secs(2));
    let gateway = Arc::new(Gateway::new(&config).unwrap());

    // WHEN: Two callers expire together
    let results = fire_concurrently(&gateway, &[EVENTS_PATH, EVENTS_PATH]).await;

    // THEN: Both fail with the timeout flag set
    for result in results {
        match result.unwrap_err() {
            GatewayError::RefreshFailed { timed_out, .. } => assert!(timed_out),
            other => panic!("Expected RefreshFailed, got {other}"),
        }
    }
    assert!(!gateway.is_refreshing());
}

/// **VALUE**: Cancelling the request that started a refresh does not cancel the refresh.
///
/// **WHY THIS MATTERS**: Callers wrap individual requests in their own timeouts or
/// `select!`. If the refresh lived inside that request's future, one impatient caller
/// would reject the whole batch and the app would sign the user out over a refresh
/// that never failed.
///
/// **BUG THIS CATCHES**: Would catch the refresh call being driven by the first
/// caller's future instead of a detached task.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_first_caller_cancelled_when_refresh_in_flight_then_others_still_recover() {
    // GIVEN: A slow refresh and a protected endpoint
    let server = MockServer::start().await;
    mount_refresh_success(&server, REFRESH_DELAY, 1).await;
    mount_session_protected(&server, PROFILE_PATH, json!({ "data": "profile" })).await;
    let gateway = gateway_for(&server);

    // WHEN: The first caller gives up after 100ms, a second caller expires at 30ms
    let impatient = {
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move {
            tokio::time::timeout(
                Duration::from_millis(100),
                gateway.send_json::<Value>(ApiRequest::get("user/me")),
            )
            .await
        })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    let patient = gateway.send_json::<Value>(ApiRequest::get("user/me")).await;

    // THEN: The first caller timed out on its own, the second got the payload
    assert!(impatient.await.unwrap().is_err(), "First caller should hit its own timeout");
    let body = patient.expect("Second caller should recover through the shared refresh");
    assert_eq!(body["data"], "profile");
    assert_eq!(gateway.refresh_episodes(), 1);
    assert!(!gateway.is_refreshing());
}

/// **VALUE**: An explicit refresh installs the cookie for subsequent requests.
#[tokio::test]
async fn given_explicit_refresh_when_then_requesting_then_no_401_seen() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::ZERO, 1).await;
    mount_session_protected(&server, PROFILE_PATH, json!({ "data": "profile" })).await;
    let gateway = gateway_for(&server);

    gateway.refresh_session().await.unwrap();
    let body: Value = gateway.send_json(ApiRequest::get("user/me")).await.unwrap();

    assert_eq!(body["data"], "profile");
    assert_eq!(gateway.refresh_episodes(), 1);
}

/// **VALUE**: Separate gateways never share refresh state.
#[tokio::test]
async fn given_two_gateways_when_one_refreshes_then_other_unaffected() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::ZERO, 1).await;
    let first = gateway_for(&server);
    let second = gateway_for(&server);

    first.refresh_session().await.unwrap();

    assert_eq!(first.refresh_episodes(), 1);
    assert_eq!(second.refresh_episodes(), 0);
}
