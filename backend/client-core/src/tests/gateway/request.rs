use crate::gateway::{ApiRequest, ApiResponse, PartValue, RequestBody, needs_refresh};
use crate::services::event::{FormPurpose, event_form_parts};
use crate::GatewayError;

use common::HttpStatusCode;
use models::{EventFormBuilder, EventType, Host, ModelError, Upload};

fn unauthorized() -> ApiResponse {
    ApiResponse::new(HttpStatusCode::UNAUTHORIZED, r#"{"message":"jwt expired"}"#)
}

/// **VALUE**: Verifies the three conditions that open a refresh episode.
///
/// **WHY THIS MATTERS**: The decision gates both the skip-refresh exemption and the
/// single-retry cap. Getting either wrong means refresh loops or refreshed logins.
#[test]
fn given_401_when_deciding_refresh_then_respects_skip_and_retry_markers() {
    // GIVEN: A plain protected request, an exempt request, and a replayed request
    let plain = ApiRequest::get("user/me");
    let exempt = ApiRequest::post("auth/login").skip_refresh();
    let mut replayed = ApiRequest::get("user/me");
    replayed.mark_retried();

    // THEN: Only the plain one refreshes
    assert!(needs_refresh(&plain, &unauthorized()));
    assert!(!needs_refresh(&exempt, &unauthorized()));
    assert!(!needs_refresh(&replayed, &unauthorized()));
}

#[test]
fn given_non_401_failure_when_deciding_refresh_then_never_refreshes() {
    let request = ApiRequest::get("events/all");

    for code in [400, 403, 404, 500, 503] {
        let response = ApiResponse::new(HttpStatusCode(code), "");
        assert!(!needs_refresh(&request, &response), "{code} must not refresh");
    }
}

/// **VALUE**: Verifies that non-2xx responses keep their status and body when surfaced.
///
/// **BUG THIS CATCHES**: Would catch the gateway flattening errors into a message string,
/// which leaves the UI unable to show the backend's explanation.
#[test]
fn given_error_response_when_into_result_then_status_and_body_preserved() {
    let response = ApiResponse::new(HttpStatusCode(409), r#"{"message":"Already joined"}"#);

    let err = response.into_result().unwrap_err();

    assert_eq!(err.http_status(), Some(HttpStatusCode(409)));
    assert_eq!(err.backend_message().as_deref(), Some("Already joined"));
    assert!(!err.is_unauthorized());
}

fn sample_form() -> EventFormBuilder {
    EventFormBuilder::default()
        .with_title("Hack Night")
        .with_description("Bring a laptop")
        .with_type(EventType::Online)
        .with_schedule("2026-11-05T18:00:00Z", "2026-11-05T22:00:00Z")
        .with_contact_info("events@example.com")
        .with_join_link("https://meet.example.com/hack")
}

fn text_value<'a>(parts: &'a [crate::gateway::FormPart], name: &str) -> Option<&'a str> {
    parts.iter().find(|p| p.name == name).and_then(|p| match &p.value {
        PartValue::Text(text) => Some(text.as_str()),
        PartValue::File(_) => None,
    })
}

/// **VALUE**: Verifies that creating an event without a thumbnail fails before any request.
#[test]
fn given_create_form_without_thumbnail_when_flattened_then_validation_error() {
    let form = sample_form().build().unwrap();

    let result = event_form_parts(&form, FormPurpose::Create);

    match result {
        Err(GatewayError::Model(ModelError::Validation { message, .. })) => {
            assert_eq!(message, "Thumbnail is required");
        }
        other => panic!("Expected thumbnail validation error, got {:?}", other.map(|p| p.len())),
    }
}

/// **VALUE**: Verifies the multipart layout the backend expects for event updates.
///
/// **WHY THIS MATTERS**: An update without a seat limit must send `totalSeats=""` or the
/// backend keeps the old limit. Hosts travel as one JSON-encoded field.
#[test]
fn given_update_form_when_flattened_then_clears_seats_and_encodes_hosts() {
    // GIVEN: An unlimited-seat form with one host and one media file
    let form = sample_form()
        .with_host(Host::new("Ada", "ada@example.com"))
        .with_media(Upload::new("slide.pdf", "application/pdf", vec![1, 2, 3]))
        .build()
        .unwrap();

    // WHEN: Flattening for update
    let parts = event_form_parts(&form, FormPurpose::Update).unwrap();

    // THEN: Seats cleared, hosts encoded, media attached, no thumbnail part
    assert_eq!(text_value(&parts, "totalSeats"), Some(""));
    assert_eq!(text_value(&parts, "type"), Some("ONLINE"));
    assert_eq!(
        text_value(&parts, "hosts"),
        Some(r#"[{"name":"Ada","email":"ada@example.com"}]"#)
    );
    assert!(parts.iter().any(|p| p.name == "media"));
    assert!(!parts.iter().any(|p| p.name == "thumbnail"));
    assert!(text_value(&parts, "venue").is_none());
}

#[test]
fn given_request_builder_when_chained_then_fields_accumulate() {
    let request = ApiRequest::post("participant/join")
        .with_query("page", "2")
        .with_header("x-trace-id", "abc")
        .with_json(serde_json::json!({ "eventId": "e-1" }));

    assert_eq!(request.method(), &reqwest::Method::POST);
    assert_eq!(request.query().len(), 1);
    assert_eq!(request.headers()[0].0, "x-trace-id");
    assert!(matches!(request.body(), RequestBody::Json(_)));
    assert!(!request.skips_refresh());
    assert!(!request.was_retried());
}
