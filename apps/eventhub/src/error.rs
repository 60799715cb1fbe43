use client_core::{ConfigError, GatewayError, SessionError};
use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Application-level failures.
///
/// Library errors are flattened to messages so the enum stays serializable
/// for whatever front end renders them; the location of the conversion is kept.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum EventhubError {
    /// Error from this App
    #[error("Eventhub Error: {message} {location}")]
    Eventhub {
        message: String,
        location: ErrorLocation,
    },

    /// Error from client-core operations (gateway, config)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// The stored user could not be read or written
    #[error("Session Error: {message} {location}")]
    Session {
        message: String,
        location: ErrorLocation,
    },

    /// The state actor is gone
    #[error("State Error: {message} {location}")]
    State {
        message: String,
        location: ErrorLocation,
    },
}

impl From<GatewayError> for EventhubError {
    #[track_caller]
    fn from(error: GatewayError) -> Self {
        EventhubError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for EventhubError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        EventhubError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<SessionError> for EventhubError {
    #[track_caller]
    fn from(error: SessionError) -> Self {
        EventhubError::Session {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
