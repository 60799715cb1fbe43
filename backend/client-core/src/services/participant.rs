use crate::error::GatewayError;
use crate::gateway::{ApiRequest, Gateway};

use models::{
    ApiEnvelope, ApiMessage, PaginatedParticipants, Participant, ParticipantStatus,
    ReviewDecision,
};

use std::sync::Arc;

use log::info;
use serde_json::json;

const JOIN_ENDPOINT: &str = "participant/join";
const PARTICIPANT_ENDPOINT: &str = "participant";
const MY_REQUESTS_ENDPOINT: &str = "participant/my-requests";
const ORGANIZER_REQUESTS_ENDPOINT: &str = "participant/related/organizer";

#[derive(Clone)]
pub struct ParticipantService {
    gateway: Arc<Gateway>,
}

impl ParticipantService {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Request to join an event.
    pub async fn join(&self, event_id: &str) -> Result<Participant, GatewayError> {
        let request = ApiRequest::post(JOIN_ENDPOINT).with_json(json!({ "eventId": event_id }));
        let envelope: ApiEnvelope<Participant> = self.gateway.send_json(request).await?;
        info!("Requested to join event {event_id}");
        Ok(envelope.data)
    }

    pub async fn update_status(
        &self,
        participant_id: &str,
        status: ParticipantStatus,
    ) -> Result<Participant, GatewayError> {
        let request = ApiRequest::patch(format!("{PARTICIPANT_ENDPOINT}/{participant_id}/status"))
            .with_json(json!({ "status": status }));
        let envelope: ApiEnvelope<Participant> = self.gateway.send_json(request).await?;
        Ok(envelope.data)
    }

    /// Cancel a participation or withdraw a pending request.
    pub async fn delete(&self, participant_id: &str) -> Result<ApiMessage, GatewayError> {
        let request = ApiRequest::delete(format!("{PARTICIPANT_ENDPOINT}/{participant_id}"));
        self.gateway.send_json(request).await
    }

    pub async fn my_requests(&self) -> Result<Vec<Participant>, GatewayError> {
        let envelope: ApiEnvelope<Vec<Participant>> = self
            .gateway
            .send_json(ApiRequest::get(MY_REQUESTS_ENDPOINT))
            .await?;
        Ok(envelope.data)
    }

    /// Paginated join requests, optionally narrowed to one status.
    pub async fn join_requests(
        &self,
        page: u32,
        limit: u32,
        status: Option<ParticipantStatus>,
    ) -> Result<PaginatedParticipants, GatewayError> {
        let mut request = ApiRequest::get(MY_REQUESTS_ENDPOINT)
            .with_query("page", page.to_string())
            .with_query("limit", limit.to_string());
        if let Some(status) = status {
            request = request.with_query("status", status.as_str());
        }
        self.gateway.send_json(request).await
    }

    /// Join requests for events the signed-in organizer runs.
    pub async fn organizer_requests(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedParticipants, GatewayError> {
        let request = ApiRequest::get(ORGANIZER_REQUESTS_ENDPOINT)
            .with_query("page", page.to_string())
            .with_query("limit", limit.to_string());
        self.gateway.send_json(request).await
    }

    /// Approve or reject a pending request.
    pub async fn review_request(
        &self,
        request_id: &str,
        decision: ReviewDecision,
    ) -> Result<(), GatewayError> {
        let request = ApiRequest::put(format!("{PARTICIPANT_ENDPOINT}/{request_id}/status"))
            .with_json(json!({ "status": decision }));
        self.gateway.send(request).await?;
        info!("Reviewed join request {request_id}: {:?}", decision);
        Ok(())
    }
}
