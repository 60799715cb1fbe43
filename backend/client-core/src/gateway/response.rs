use crate::error::GatewayError;

use common::HttpStatusCode;

use serde::de::DeserializeOwned;

/// A fully read backend response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: HttpStatusCode,
    body: String,
}

impl ApiResponse {
    pub fn new(status: HttpStatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub(crate) async fn read(response: reqwest::Response) -> Result<Self, GatewayError> {
        let status = HttpStatusCode(response.status().as_u16());
        let body = response.text().await?;
        Ok(Self { status, body })
    }

    pub fn status(&self) -> HttpStatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Non-2xx responses become [`GatewayError::Status`] with the body preserved.
    #[track_caller]
    pub fn into_result(self) -> Result<Self, GatewayError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(GatewayError::status(self.status, self.body))
        }
    }
}
