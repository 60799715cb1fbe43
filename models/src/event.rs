use crate::participant::ParticipantStatus;

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Online,
    Onsite,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Online => "ONLINE",
            EventType::Onsite => "ONSITE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Host {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Host {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A participant row embedded in an event payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub status: ParticipantStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub join_link: Option<String>,
    pub thumbnail: String,
    #[serde(default)]
    pub contact_info: Option<String>,
    pub start_at: String,
    pub end_at: String,
    #[serde(default)]
    pub participants: Vec<Registration>,
    #[serde(default)]
    pub hosts: Vec<Host>,
    #[serde(default)]
    pub organizers: Vec<Organizer>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub total_seats: Option<u32>,
    #[serde(default)]
    pub confirmed_count: u32,
}

impl Event {
    /// Seats still open, or `None` for events without a seat limit.
    pub fn seats_remaining(&self) -> Option<u32> {
        self.total_seats
            .map(|total| total.saturating_sub(self.confirmed_count))
    }
}

/// Listing parameters shared by `events/all` and `events/my-events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub page: u32,
    pub limit: u32,
    pub filter_by: Option<String>,
    pub search: Option<String>,
    pub event_type: Option<EventType>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            filter_by: None,
            search: None,
            event_type: None,
        }
    }
}

impl EventQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn filter_by(mut self, filter: impl Into<String>) -> Self {
        self.filter_by = Some(filter.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Query-string pairs; unset filters are omitted rather than sent empty.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (String::from("page"), self.page.to_string()),
            (String::from("limit"), self.limit.to_string()),
        ];
        if let Some(filter) = &self.filter_by {
            pairs.push((String::from("filterBy"), filter.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push((String::from("search"), search.clone()));
        }
        if let Some(event_type) = self.event_type {
            pairs.push((String::from("type"), event_type.as_str().to_string()));
        }
        pairs
    }
}
