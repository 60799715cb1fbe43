use crate::helpers::{authenticated_gateway, gateway_for, mount_refresh_failure};

use client_core::ParticipantService;
use models::{ParticipantStatus, ReviewDecision};

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn participant_json(status: &str) -> Value {
    json!({
        "id": "p-1",
        "eventId": "e-1",
        "status": status,
        "createdAt": "2026-10-01T10:00:00.000Z"
    })
}

fn request_row_json(status: &str) -> Value {
    json!({
        "id": "p-1",
        "userId": "u-2",
        "eventId": "e-1",
        "status": status,
        "createdAt": "2026-10-01T10:00:00.000Z",
        "event": {
            "id": "e-1",
            "title": "RustConf Meetup",
            "startAt": "2026-11-01T18:00:00.000Z",
            "endAt": "2026-11-01T21:00:00.000Z",
            "type": "ONSITE"
        },
        "user": { "id": "u-2", "fullName": "Grace Hopper", "email": "grace@example.com" }
    })
}

#[tokio::test]
async fn given_event_when_joining_then_pending_participation_returned() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/participant/join"))
        .and(body_json(json!({ "eventId": "e-1" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "success": true, "data": participant_json("PENDING") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let participant = ParticipantService::new(gateway).join("e-1").await.unwrap();

    assert_eq!(participant.status, ParticipantStatus::Pending);
    assert!(participant.user.is_none());
}

#[tokio::test]
async fn given_participation_when_updating_status_then_patch_sent() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("PATCH"))
        .and(path("/api/participant/p-1/status"))
        .and(body_json(json!({ "status": "JOINED" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "data": participant_json("JOINED") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let participant = ParticipantService::new(gateway)
        .update_status("p-1", ParticipantStatus::Joined)
        .await
        .unwrap();

    assert_eq!(participant.status, ParticipantStatus::Joined);
}

/// **VALUE**: Organizers approve or reject with PUT and the decision in the body.
#[tokio::test]
async fn given_pending_request_when_reviewing_then_decision_sent() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/participant/p-1/status"))
        .and(body_json(json!({ "status": "REJECTED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    ParticipantService::new(gateway)
        .review_request("p-1", ReviewDecision::Rejected)
        .await
        .unwrap();
}

#[tokio::test]
async fn given_status_filter_when_listing_requests_then_filter_in_query() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/participant/my-requests"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "5"))
        .and(query_param("status", "APPROVED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "participants": [request_row_json("APPROVED")],
            "total": 1,
            "totalPages": 1,
            "currentPage": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = ParticipantService::new(gateway)
        .join_requests(1, 5, Some(ParticipantStatus::Approved))
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.participants[0].user.full_name, "Grace Hopper");
    assert_eq!(page.participants[0].event.title, "RustConf Meetup");
}

#[tokio::test]
async fn given_organizer_when_listing_related_requests_then_paginated() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/participant/related/organizer"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "participants": [],
            "total": 11,
            "totalPages": 2,
            "currentPage": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = ParticipantService::new(gateway)
        .organizer_requests(2, 10)
        .await
        .unwrap();

    assert!(page.participants.is_empty());
    assert_eq!(page.current_page, 2);
}

#[tokio::test]
async fn given_participation_when_withdrawing_then_acknowledged() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/participant/p-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Request withdrawn" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let message = ParticipantService::new(gateway).delete("p-1").await.unwrap();

    assert_eq!(message.message.as_deref(), Some("Request withdrawn"));
}

/// **VALUE**: A session that cannot be refreshed ends the call with a session-expired error.
#[tokio::test]
async fn given_dead_session_when_loading_my_requests_then_session_expired() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 403, Duration::ZERO, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/participant/my-requests"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = ParticipantService::new(gateway_for(&server))
        .my_requests()
        .await
        .unwrap_err();

    assert!(err.is_session_expired());
}
