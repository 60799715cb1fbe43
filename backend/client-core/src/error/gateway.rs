//! Error types for the request gateway.
//!
//! - HTTP status codes and response bodies are kept verbatim so callers can
//!   tell a rejected login from an ended session
//! - All errors include ErrorLocation for debugging
//! - `#[track_caller]` for automatic location capture

use crate::error::config::ConfigError;
use crate::gateway::refresh::RefreshRejection;

use common::{ErrorLocation, HttpStatusCode};
use models::ModelError;

use std::panic::Location;

use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum GatewayError {
    /// The backend answered with a non-2xx status the gateway did not recover from.
    #[error("HTTP Status Error: {status} - {body} {location}")]
    Status {
        status: HttpStatusCode,
        body: String,
        location: ErrorLocation,
    },

    /// The refresh episode this request depended on failed; the session has ended.
    #[error("Session Refresh Error: {message} {location}")]
    RefreshFailed {
        status: Option<HttpStatusCode>,
        message: String,
        timed_out: bool,
        location: ErrorLocation,
    },

    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Request Error: {message} {location}")]
    InvalidRequest {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    /// The gateway was built from a config that fails validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GatewayError {
    #[track_caller]
    pub fn status(status: HttpStatusCode, body: impl Into<String>) -> Self {
        GatewayError::Status {
            status,
            body: body.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        GatewayError::InvalidRequest {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn refresh_failed(rejection: RefreshRejection) -> Self {
        GatewayError::RefreshFailed {
            status: rejection.status,
            message: rejection.message,
            timed_out: rejection.timed_out,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The HTTP status attached to this error, if the backend produced one.
    pub fn http_status(&self) -> Option<HttpStatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::RefreshFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// A 401 that reached the caller: a rejected login, or a replay that
    /// was still unauthorized after a successful refresh.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Status { status, .. } if status.is_unauthorized())
    }

    /// The session could not be refreshed; callers should drop to the
    /// signed-out state.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, GatewayError::RefreshFailed { .. })
    }

    /// The `message` field of a JSON error body, if the backend sent one.
    pub fn backend_message(&self) -> Option<String> {
        let body = match self {
            GatewayError::Status { body, .. } => body,
            _ => return None,
        };

        serde_json::from_str::<Value>(body)
            .ok()?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }
}

impl From<url::ParseError> for GatewayError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        GatewayError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        GatewayError::Transport {
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        GatewayError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
