//! Authenticated request gateway.
//!
//! Every backend call goes through [`Gateway::send`]. The gateway relies on
//! the cookie store inside its HTTP client for the session credential and
//! never sees a token value. When a call fails with 401 it joins the current
//! refresh episode (see [`refresh`]) and, if the refresh succeeds, replays
//! the call exactly once. The refresh call runs on its own task and outlives
//! any individual request.

pub mod refresh;
pub mod request;
pub mod response;

pub use refresh::{RefreshCoordinator, RefreshRejection};
pub use request::{ApiRequest, FormPart, PartValue, RequestBody};
pub use response::ApiResponse;

use crate::config::GatewayConfig;
use crate::error::GatewayError;

use refresh::{RefreshOutcome, RefreshTicket, await_outcome};

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use url::Url;

pub struct Gateway {
    base_url: Url,
    client: Client,
    refresh: RefreshCall,
    queue_timeout: Duration,
    coordinator: Arc<RefreshCoordinator>,
}

/// Everything a detached task needs to perform the refresh call.
///
/// The client shares its cookie jar with the gateway, so a refreshed cookie
/// is visible to every later request.
#[derive(Clone)]
struct RefreshCall {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl Gateway {
    /// Build a gateway with its own cookie jar and refresh coordinator.
    ///
    /// # Errors
    /// Returns [`GatewayError::Config`] if the config fails validation, or
    /// another [`GatewayError`] if the HTTP client cannot be constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;

        let base_url = config.normalized_base_url()?;
        let refresh_url = base_url.join(config.refresh_path.trim_start_matches('/'))?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            base_url,
            refresh: RefreshCall {
                client: client.clone(),
                url: refresh_url,
                timeout: config.refresh_timeout(),
            },
            client,
            queue_timeout: config.queue_timeout(),
            coordinator: Arc::new(RefreshCoordinator::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// True while a refresh call is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.coordinator.is_refreshing()
    }

    /// Requests currently parked on the open refresh episode.
    pub fn queued_requests(&self) -> usize {
        self.coordinator.queued()
    }

    /// Refresh episodes opened by this gateway so far.
    pub fn refresh_episodes(&self) -> u64 {
        self.coordinator.episodes()
    }

    /// Send a request, recovering once from an expired session.
    ///
    /// # Errors
    /// - [`GatewayError::Status`] for any non-2xx the gateway does not recover
    ///   from, body preserved
    /// - [`GatewayError::RefreshFailed`] if the refresh episode this request
    ///   joined failed or timed out
    /// - [`GatewayError::Transport`] for network-level failures
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        loop {
            let response = self.dispatch(&request).await?;

            if !needs_refresh(&request, &response) {
                return response.into_result();
            }

            debug!(
                "{} {} returned 401, joining refresh episode",
                request.method(),
                request.path()
            );
            request.mark_retried();
            self.await_refresh().await?;
            debug!("Replaying {} {}", request.method(), request.path());
        }
    }

    /// [`Gateway::send`] followed by JSON decoding of the body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, GatewayError> {
        self.send(request).await?.json()
    }

    /// Run a refresh episode now, or join the one already in flight.
    pub async fn refresh_session(&self) -> Result<(), GatewayError> {
        self.await_refresh().await
    }

    async fn await_refresh(&self) -> Result<(), GatewayError> {
        let receiver = match self.coordinator.join() {
            RefreshTicket::Leader { lease, outcome } => {
                info!("Session expired, refreshing");
                let call = self.refresh.clone();
                tokio::spawn(async move {
                    let outcome = call.run().await;
                    let released = lease.resolve(&outcome);
                    match &outcome {
                        Ok(()) => info!("Session refreshed, released {released} queued request(s)"),
                        Err(rejection) => warn!(
                            "Session refresh failed: {}; rejected {released} queued request(s)",
                            rejection.message
                        ),
                    }
                });
                outcome
            }
            RefreshTicket::Waiter(receiver) => receiver,
        };

        match await_outcome(receiver, self.queue_timeout).await {
            Ok(()) => Ok(()),
            Err(rejection) => Err(GatewayError::refresh_failed(rejection)),
        }
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, GatewayError> {
        let url = self.base_url.join(request.path().trim_start_matches('/'))?;

        let mut builder = self.client.request(request.method().clone(), url);

        if !request.query().is_empty() {
            builder = builder.query(request.query());
        }

        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder.send().await?;
        ApiResponse::read(response).await
    }
}

impl RefreshCall {
    /// The refresh request bypasses [`Gateway::send`], so it can never
    /// enter the refresh protocol itself.
    async fn run(&self) -> RefreshOutcome {
        match timeout(self.timeout, self.exchange()).await {
            Err(_) => Err(RefreshRejection::timed_out(self.timeout)),
            Ok(Err(e)) => Err(RefreshRejection::transport(e.to_string())),
            Ok(Ok(response)) if response.status().is_success() => Ok(()),
            Ok(Ok(response)) => Err(RefreshRejection::rejected(
                response.status(),
                response.body(),
            )),
        }
    }

    async fn exchange(&self) -> Result<ApiResponse, GatewayError> {
        let response = self.client.get(self.url.clone()).send().await?;
        ApiResponse::read(response).await
    }
}

/// 401 on a request that is neither exempt nor already replayed.
pub(crate) fn needs_refresh(request: &ApiRequest, response: &ApiResponse) -> bool {
    response.status().is_unauthorized() && !request.skips_refresh() && !request.was_retried()
}

fn build_form(parts: &[FormPart]) -> Result<Form, GatewayError> {
    let mut form = Form::new();

    for part in parts {
        form = match &part.value {
            PartValue::Text(text) => form.text(part.name.clone(), text.clone()),
            PartValue::File(upload) => {
                let file = Part::bytes(upload.bytes.clone())
                    .file_name(upload.file_name.clone())
                    .mime_str(&upload.mime)?;
                form.part(part.name.clone(), file)
            }
        };
    }

    Ok(form)
}
