//! Keeps the current-user projection in step with the backend session.

use crate::error::EventhubError;
use crate::state::{AppState, StateCommand};

use client_core::{AuthService, GatewayError};
use common::ErrorLocation;
use models::{LoginPayload, User};

use std::panic::Location;

use log::{info, warn};

/// Ask the backend who is signed in and update `state` to match.
///
/// Returns the current user, or `None` when the session is over. A session
/// that ended (refresh failed, or a 401 survived the refresh) clears the
/// stored user. Any other failure leaves the projection untouched so an
/// offline start still shows the last known user.
///
/// # Errors
///
/// Returns [`EventhubError`] for failures that say nothing about the session
/// (backend unreachable, 5xx) or when the state actor is gone.
pub async fn sync_current_user(
    state: &AppState,
    auth: &AuthService,
) -> Result<Option<User>, EventhubError> {
    match auth.me().await {
        Ok(user) => {
            state.update(StateCommand::SetUser(user.clone())).await?;
            Ok(Some(user))
        }
        Err(e) if session_ended(&e) => {
            info!("Session ended: {e}");
            state.update(StateCommand::ClearUser).await?;
            Ok(None)
        }
        Err(e) => {
            warn!("Could not sync current user: {e}");
            Err(e.into())
        }
    }
}

/// Sign in and record the user.
///
/// A rejected login (`success: false`, or a 401) leaves the state signed
/// out and returns the backend's message.
pub async fn sign_in(
    state: &AppState,
    auth: &AuthService,
    payload: &LoginPayload,
) -> Result<User, EventhubError> {
    let response = auth.login(payload).await.map_err(|e| match e.backend_message() {
        Some(message) if e.is_unauthorized() => EventhubError::Core {
            message,
            location: ErrorLocation::from(Location::caller()),
        },
        _ => EventhubError::from(e),
    })?;

    match response.user {
        Some(user) if response.success => {
            state.update(StateCommand::SetUser(user.clone())).await?;
            Ok(user)
        }
        _ => Err(EventhubError::Core {
            message: response
                .message
                .unwrap_or_else(|| String::from("Login failed")),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

/// Sign out. The local projection is cleared even if the backend call fails.
pub async fn sign_out(state: &AppState, auth: &AuthService) -> Result<(), EventhubError> {
    let logout = auth.logout().await;
    state.update(StateCommand::ClearUser).await?;

    match logout {
        Ok(_) => Ok(()),
        Err(e) if session_ended(&e) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn session_ended(error: &GatewayError) -> bool {
    error.is_session_expired() || error.is_unauthorized()
}
