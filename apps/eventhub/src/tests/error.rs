use crate::error::EventhubError;

use client_core::GatewayError;
use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

/// **VALUE**: Tests that errors can be serialized for the UI layer.
///
/// **WHY THIS MATTERS**: Errors cross into whatever renders them as JSON. If
/// serialization breaks, the user sees an opaque failure.
///
/// **BUG THIS CATCHES**: Would catch a non-serializable field being added to a variant.
#[test]
fn given_eventhub_error_when_serialized_then_tagged_json() {
    // GIVEN: An EventhubError
    let err = EventhubError::State {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Serializing to JSON
    let json = serde_json::to_value(&err).unwrap();

    // THEN: Variant tag and message are present
    assert_eq!(json["type"], "State");
    assert_eq!(json["data"]["message"], "Test");
}

#[test]
fn given_gateway_error_when_converted_then_core_variant_keeps_message() {
    let gateway_err = GatewayError::status(HttpStatusCode::from(503), "maintenance");

    let err = EventhubError::from(gateway_err);

    match err {
        EventhubError::Core { message, .. } => assert!(message.contains("maintenance")),
        other => panic!("Expected Core variant, got {other}"),
    }
}
