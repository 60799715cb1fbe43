use serde::{Deserialize, Serialize};

/// Every status the backend reports for a join request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    Pending,
    Approved,
    Joined,
    Declined,
    Rejected,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Pending => "PENDING",
            ParticipantStatus::Approved => "APPROVED",
            ParticipantStatus::Joined => "JOINED",
            ParticipantStatus::Declined => "DECLINED",
            ParticipantStatus::Rejected => "REJECTED",
        }
    }
}

/// Organizer decision on a pending join request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    #[serde(default)]
    pub user: Option<ParticipantUser>,
    pub event_id: String,
    pub status: ParticipantStatus,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_at: String,
    pub end_at: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub join_link: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

/// A join request joined with its event and requesting user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEvent {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub status: ParticipantStatus,
    pub created_at: String,
    pub event: EventSummary,
    pub user: ParticipantUser,
}
