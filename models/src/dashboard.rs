use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PopularEvent {
    pub id: String,
    pub title: String,
    pub participants_count: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventModeSplit {
    #[serde(rename = "ONLINE", default)]
    pub online: u32,
    #[serde(rename = "ONSITE", default)]
    pub onsite: u32,
}

/// Aggregates served by `events/dashboard/analysis`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardData {
    pub total_events: u32,
    pub incoming_events: u32,
    pub past_events: u32,
    pub ongoing_events: u32,
    pub cancelled_events: u32,
    pub total_participants: u32,
    pub average_seats_filled: f64,
    #[serde(default)]
    pub most_popular_event: Option<PopularEvent>,
    pub pending_join_requests: u32,
    pub approval_rate: f64,
    #[serde(default)]
    pub online_vs_onsite: EventModeSplit,
    /// Event count per calendar day, keyed by ISO date.
    #[serde(default)]
    pub events_last30_days: BTreeMap<String, u32>,
}
