//! Persistence for the signed-in user projection.
//!
//! Holds only what the UI renders (name, role, avatar). The session
//! credential itself stays in the gateway's cookie store and is never written
//! here.

use crate::error::session::SessionError;

use common::ErrorLocation;
use models::User;

use std::panic::Location;
use std::path::PathBuf;

use log::{debug, info, warn};

const USER_FILE_NAME: &str = "user.json";

#[derive(Debug, Clone)]
pub struct UserStore {
    dir: PathBuf,
}

impl UserStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(USER_FILE_NAME)
    }

    /// Load the stored user.
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if nothing is stored.
    /// Returns `Err(SessionError)` if the file exists but is unreadable or corrupt.
    pub fn load(&self) -> Result<Option<User>, SessionError> {
        let path = self.path();

        if !path.exists() {
            debug!("No stored user at {}", path.display());
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| SessionError::ReadError {
            location: ErrorLocation::from(Location::caller()),
            path: path.clone(),
            source: e,
        })?;

        let user: User = serde_json::from_str(&contents).map_err(|e| {
            warn!("Stored user is corrupt: {}", e);
            SessionError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

        debug!("Restored user {} from {}", user.id, path.display());
        Ok(Some(user))
    }

    /// Persist the user using temp file + rename so a crash never leaves a
    /// half-written file behind.
    pub fn save(&self, user: &User) -> Result<(), SessionError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| SessionError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.path();
        let temp_path = self.dir.join(format!("{USER_FILE_NAME}.tmp"));

        let json = serde_json::to_string_pretty(user).map_err(|e| SessionError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| SessionError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &path).map_err(|e| SessionError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: path.clone(),
            source: e,
        })?;

        info!("Stored user {}", user.id);
        Ok(())
    }

    /// Remove the stored user. Clearing an empty store is not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        let path = self.path();

        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Cleared stored user");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::WriteError {
                location: ErrorLocation::from(Location::caller()),
                path,
                source: e,
            }),
        }
    }
}

