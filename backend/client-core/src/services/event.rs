use crate::error::GatewayError;
use crate::gateway::{ApiRequest, FormPart, Gateway};

use common::ErrorLocation;
use models::{
    AdminDashboardData, ApiEnvelope, Event, EventForm, EventQuery, ModelError, PaginatedEvents,
};

use std::panic::Location;
use std::sync::Arc;

use log::{debug, info};
use serde_json::Value;

const CREATE_ENDPOINT: &str = "events/create";
const UPDATE_ENDPOINT: &str = "events/update";
const LIST_ENDPOINT: &str = "events/all";
const MY_EVENTS_ENDPOINT: &str = "events/my-events";
const EVENTS_ENDPOINT: &str = "events";
const DELETE_ENDPOINT: &str = "events/delete";
const DELETE_ATTACHMENT_ENDPOINT: &str = "events/delete-attachment";
const DASHBOARD_ENDPOINT: &str = "events/dashboard/analysis";

/// Whether a form is submitted for a new event or an existing one.
///
/// Creation requires a thumbnail and omits unset seats; updates keep the
/// existing thumbnail when none is supplied and send an empty seat count to
/// lift a previous limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    Create,
    Update,
}

#[derive(Clone)]
pub struct EventService {
    gateway: Arc<Gateway>,
}

impl EventService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, form: &EventForm) -> Result<Value, GatewayError> {
        let parts = event_form_parts(form, FormPurpose::Create)?;
        let request = ApiRequest::post(CREATE_ENDPOINT).with_multipart(parts);
        let created = self.gateway.send_json(request).await?;
        info!("Created event '{}'", form.title);
        Ok(created)
    }

    pub async fn update(&self, id: &str, form: &EventForm) -> Result<Value, GatewayError> {
        let parts = event_form_parts(form, FormPurpose::Update)?;
        let request = ApiRequest::put(format!("{UPDATE_ENDPOINT}/{id}")).with_multipart(parts);
        let updated = self.gateway.send_json(request).await?;
        info!("Updated event {id}");
        Ok(updated)
    }

    /// Public event listing.
    pub async fn list(&self, query: &EventQuery) -> Result<PaginatedEvents, GatewayError> {
        let request = ApiRequest::get(LIST_ENDPOINT).with_query_pairs(query.to_pairs());
        self.gateway.send_json(request).await
    }

    /// Events organized by the signed-in user.
    pub async fn my_events(&self, query: &EventQuery) -> Result<PaginatedEvents, GatewayError> {
        let request = ApiRequest::get(MY_EVENTS_ENDPOINT).with_query_pairs(query.to_pairs());
        self.gateway.send_json(request).await
    }

    pub async fn get(&self, id: &str) -> Result<Event, GatewayError> {
        let request = ApiRequest::get(format!("{EVENTS_ENDPOINT}/{id}"));
        let envelope: ApiEnvelope<Event> = self.gateway.send_json(request).await?;
        Ok(envelope.data)
    }

    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        self.gateway
            .send(ApiRequest::delete(format!("{DELETE_ENDPOINT}/{id}")))
            .await?;
        info!("Deleted event {id}");
        Ok(())
    }

    pub async fn delete_attachment(&self, attachment_id: &str) -> Result<(), GatewayError> {
        self.gateway
            .send(ApiRequest::delete(format!(
                "{DELETE_ATTACHMENT_ENDPOINT}/{attachment_id}"
            )))
            .await?;
        debug!("Deleted attachment {attachment_id}");
        Ok(())
    }

    pub async fn admin_dashboard(&self) -> Result<AdminDashboardData, GatewayError> {
        let envelope: ApiEnvelope<AdminDashboardData> = self
            .gateway
            .send_json(ApiRequest::get(DASHBOARD_ENDPOINT))
            .await?;
        Ok(envelope.data)
    }
}

/// Flatten an [`EventForm`] into multipart parts.
#[track_caller]
pub fn event_form_parts(form: &EventForm, purpose: FormPurpose) -> Result<Vec<FormPart>, GatewayError> {
    let mut parts = vec![
        FormPart::text("title", form.title.as_str()),
        FormPart::text("description", form.description.as_str()),
        FormPart::text("type", form.event_type.as_str()),
        FormPart::text("startAt", form.start_at.as_str()),
        FormPart::text("endAt", form.end_at.as_str()),
        FormPart::text("contactInfo", form.contact_info.as_str()),
    ];

    if let Some(venue) = &form.venue {
        parts.push(FormPart::text("venue", venue.as_str()));
    }
    if let Some(link) = &form.join_link {
        parts.push(FormPart::text("joinLink", link.as_str()));
    }

    if !form.hosts.is_empty() {
        parts.push(FormPart::text("hosts", serde_json::to_string(&form.hosts)?));
    }

    match (form.total_seats, purpose) {
        (Some(seats), _) => parts.push(FormPart::text("totalSeats", seats.to_string())),
        (None, FormPurpose::Update) => parts.push(FormPart::text("totalSeats", "")),
        (None, FormPurpose::Create) => {}
    }

    parts.push(FormPart::text("folder", form.folder.as_str()));

    match (&form.thumbnail, purpose) {
        (Some(thumbnail), _) => parts.push(FormPart::file("thumbnail", thumbnail.clone())),
        (None, FormPurpose::Update) => {}
        (None, FormPurpose::Create) => {
            return Err(GatewayError::Model(ModelError::Validation {
                message: String::from("Thumbnail is required"),
                location: ErrorLocation::from(Location::caller()),
            }));
        }
    }

    for media in &form.media {
        parts.push(FormPart::file("media", media.clone()));
    }

    Ok(parts)
}
