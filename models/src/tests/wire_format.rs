use crate::{
    AdminDashboardData, Event, EventQuery, EventType, LoginPayload, PaginatedEvents,
    ParticipantStatus, Role, User,
};

use serde_json::json;

/// **VALUE**: Verifies that the camelCase user payload from `user/me` decodes.
///
/// **BUG THIS CATCHES**: Would catch a missing `rename_all`, which would make every
/// session restore fail with "missing field full_name".
#[test]
fn given_backend_user_json_when_decoded_then_fields_map() {
    let value = json!({
        "id": "u-1",
        "email": "org@example.com",
        "fullName": "Olga Organizer",
        "phone": null,
        "role": "ORGANIZER",
        "profilePic": null
    });

    let user: User = serde_json::from_value(value).unwrap();

    assert_eq!(user.full_name, "Olga Organizer");
    assert_eq!(user.role, Role::Organizer);
    assert_eq!(user.phone, None);
}

#[test]
fn given_paginated_events_when_decoded_then_type_and_seats_map() {
    let value = json!({
        "success": true,
        "message": "ok",
        "count": 1,
        "pagination": { "total": 11, "page": 1, "limit": 10, "totalPages": 2 },
        "data": [{
            "id": "e-1",
            "title": "Launch",
            "description": "Product launch",
            "type": "ONLINE",
            "joinLink": "https://meet.example.com/x",
            "thumbnail": "https://cdn.example.com/t.png",
            "startAt": "2026-11-01T10:00:00Z",
            "endAt": "2026-11-01T11:00:00Z",
            "participants": [{
                "id": "p-1", "userId": "u-2", "eventId": "e-1",
                "status": "JOINED", "createdAt": "2026-10-01T00:00:00Z"
            }],
            "totalSeats": 50,
            "confirmedCount": 12
        }]
    });

    let page: PaginatedEvents = serde_json::from_value(value).unwrap();
    let event: &Event = &page.data[0];

    assert!(page.pagination.has_next());
    assert_eq!(event.event_type, EventType::Online);
    assert_eq!(event.participants[0].status, ParticipantStatus::Joined);
    assert_eq!(event.seats_remaining(), Some(38));
}

#[test]
fn given_dashboard_json_when_decoded_then_mode_split_and_days_map() {
    let value = json!({
        "totalEvents": 10,
        "incomingEvents": 3,
        "pastEvents": 5,
        "ongoingEvents": 1,
        "cancelledEvents": 1,
        "totalParticipants": 120,
        "averageSeatsFilled": 64.5,
        "mostPopularEvent": null,
        "pendingJoinRequests": 4,
        "approvalRate": 0.8,
        "onlineVsOnsite": { "ONLINE": 6, "ONSITE": 4 },
        "eventsLast30Days": { "2026-10-01": 2, "2026-10-02": 0 }
    });

    let dashboard: AdminDashboardData = serde_json::from_value(value).unwrap();

    assert_eq!(dashboard.online_vs_onsite.online, 6);
    assert_eq!(dashboard.events_last30_days.get("2026-10-01"), Some(&2));
    assert!(dashboard.most_popular_event.is_none());
}

/// **VALUE**: Verifies that unset listing filters are omitted from the query string.
///
/// **BUG THIS CATCHES**: Would catch `search=` being sent empty, which the backend
/// treats as "match nothing" on some filters.
#[test]
fn given_event_query_when_converted_then_only_set_filters_are_sent() {
    let query = EventQuery::default().search("rust").event_type(EventType::Onsite);

    let pairs = query.to_pairs();

    assert!(pairs.contains(&(String::from("page"), String::from("1"))));
    assert!(pairs.contains(&(String::from("limit"), String::from("10"))));
    assert!(pairs.contains(&(String::from("search"), String::from("rust"))));
    assert!(pairs.contains(&(String::from("type"), String::from("ONSITE"))));
    assert!(!pairs.iter().any(|(k, _)| k == "filterBy"));
}

#[test]
fn given_login_payload_when_serialized_then_password_is_exposed_only_in_body() {
    let payload = LoginPayload::new("p@example.com", "s3cret-pass");

    let body = payload.to_json();

    assert_eq!(body["password"], "s3cret-pass");
    assert!(!format!("{:?}", payload).contains("s3cret"));
}
