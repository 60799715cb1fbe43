use crate::helpers::{FRESH_COOKIE, authenticated_gateway, gateway_for, mount_refresh_success};

use client_core::EventService;
use models::{EventFormBuilder, EventQuery, EventType, Host, Upload};

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn event_json(id: &str) -> Value {
    json!({
        "id": id,
        "title": "RustConf Meetup",
        "description": "Talks and pizza",
        "type": "ONSITE",
        "venue": "Hall A",
        "thumbnail": "https://cdn/thumb.png",
        "startAt": "2026-11-01T18:00:00.000Z",
        "endAt": "2026-11-01T21:00:00.000Z",
        "hosts": [{ "name": "Ferris", "email": "ferris@example.com" }],
        "totalSeats": 40,
        "confirmedCount": 12
    })
}

fn page_json(events: Vec<Value>, page: u32, total_pages: u32) -> Value {
    json!({
        "success": true,
        "count": events.len(),
        "pagination": { "total": events.len(), "page": page, "limit": 10, "totalPages": total_pages },
        "data": events
    })
}

/// **VALUE**: Listing forwards the query filters and decodes the page.
#[tokio::test]
async fn given_filters_when_listing_then_query_string_carries_them() {
    // GIVEN: Listing endpoint that insists on the filters
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/all"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "rust"))
        .and(query_param("type", "ONSITE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![event_json("e-1")], 2, 3)))
        .expect(1)
        .mount(&server)
        .await;
    let events = EventService::new(gateway_for(&server));

    // WHEN: Listing page 2 of onsite rust events
    let query = EventQuery::default()
        .page(2)
        .search("rust")
        .event_type(EventType::Onsite);
    let page = events.list(&query).await.unwrap();

    // THEN: The page decodes with its pagination
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].seats_remaining(), Some(28));
    assert!(page.pagination.has_next());
}

/// **VALUE**: An organizer's own listing recovers from an expired session transparently.
#[tokio::test]
async fn given_expired_session_when_listing_my_events_then_recovered() {
    // GIVEN: my-events requires the fresh cookie
    let server = MockServer::start().await;
    mount_refresh_success(&server, Duration::ZERO, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/events/my-events"))
        .and(header("cookie", FRESH_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 1, 1)))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/events/my-events"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let gateway = gateway_for(&server);
    let events = EventService::new(gateway.clone());

    // WHEN: Listing
    let page = events.my_events(&EventQuery::default()).await.unwrap();

    // THEN: Empty page, one refresh
    assert!(page.data.is_empty());
    assert!(!page.pagination.has_next());
    assert_eq!(gateway.refresh_episodes(), 1);
}

#[tokio::test]
async fn given_event_id_when_fetching_then_envelope_unwrapped() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/events/e-7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": event_json("e-7") })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let event = EventService::new(gateway).get("e-7").await.unwrap();

    assert_eq!(event.id, "e-7");
    assert_eq!(event.event_type, EventType::Onsite);
    assert_eq!(event.hosts[0].name, "Ferris");
}

/// **VALUE**: Creating an event submits every field and the thumbnail as multipart.
///
/// **BUG THIS CATCHES**: Would catch hosts sent as separate parts instead of one JSON
/// string, or the default media folder going missing.
#[tokio::test]
async fn given_complete_form_when_creating_then_multipart_carries_fields_and_files() {
    // GIVEN: Create endpoint that checks the multipart body
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/events/create"))
        .and(body_string_contains("name=\"title\""))
        .and(body_string_contains("RustConf Meetup"))
        .and(body_string_contains("name=\"hosts\""))
        .and(body_string_contains("ferris@example.com"))
        .and(body_string_contains("Event_Management/Event"))
        .and(body_string_contains("filename=\"thumb.png\""))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "success": true, "data": event_json("e-9") })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let form = EventFormBuilder::default()
        .with_title("RustConf Meetup")
        .with_description("Talks and pizza")
        .with_type(EventType::Onsite)
        .with_schedule("2026-11-01T18:00", "2026-11-01T21:00")
        .with_contact_info("ferris@example.com")
        .with_venue("Hall A")
        .with_host(Host::new("Ferris", "ferris@example.com"))
        .with_total_seats(40)
        .with_thumbnail(Upload::new("thumb.png", "image/png", b"png".to_vec()))
        .build()
        .unwrap();

    // WHEN: Creating
    let created = EventService::new(gateway).create(&form).await.unwrap();

    // THEN: Backend payload is handed back
    assert_eq!(created["data"]["id"], "e-9");
}

/// **VALUE**: Creating without a thumbnail fails locally, before any request is sent.
#[tokio::test]
async fn given_form_without_thumbnail_when_creating_then_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/events/create"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let form = EventFormBuilder::default()
        .with_title("No thumbnail")
        .with_description("d")
        .with_type(EventType::Online)
        .with_schedule("2026-11-01T18:00", "2026-11-01T21:00")
        .with_contact_info("c")
        .with_join_link("https://meet.example.com/x")
        .build()
        .unwrap();

    let err = EventService::new(gateway_for(&server))
        .create(&form)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Thumbnail is required"));
}

#[tokio::test]
async fn given_event_when_deleting_then_delete_issued() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/delete/e-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/delete-attachment/a-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    let events = EventService::new(gateway);

    events.delete_attachment("a-1").await.unwrap();
    events.delete("e-3").await.unwrap();
}

#[tokio::test]
async fn given_admin_session_when_loading_dashboard_then_aggregates_decoded() {
    let server = MockServer::start().await;
    let gateway = authenticated_gateway(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/events/dashboard/analysis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "totalEvents": 12,
                "incomingEvents": 4,
                "pastEvents": 6,
                "ongoingEvents": 1,
                "cancelledEvents": 1,
                "totalParticipants": 90,
                "averageSeatsFilled": 62.5,
                "mostPopularEvent": { "id": "e-1", "title": "RustConf Meetup", "participantsCount": 40 },
                "pendingJoinRequests": 3,
                "approvalRate": 87.5,
                "onlineVsOnsite": { "ONLINE": 5, "ONSITE": 7 },
                "eventsLast30Days": { "2026-10-01": 2, "2026-10-02": 1 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let data = EventService::new(gateway).admin_dashboard().await.unwrap();

    assert_eq!(data.total_events, 12);
    assert_eq!(data.online_vs_onsite.onsite, 7);
    assert_eq!(data.most_popular_event.map(|e| e.participants_count), Some(40));
    assert_eq!(data.events_last30_days.len(), 2);
}
