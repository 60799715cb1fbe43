use crate::error::EventhubError;

use client_core::UserStore;
use common::ErrorLocation;
use models::User;

use std::panic::Location;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};

const COMMAND_BUFFER: usize = 100;

/// Commands that mutate application state.
///
/// All state mutations go through the state actor via these commands.
#[derive(Debug, Clone)]
pub enum StateCommand {
    /// Signed in, or `user/me` returned a fresh projection
    SetUser(User),

    /// Signed out, or the session could not be refreshed
    ClearUser,
}

struct Envelope {
    command: StateCommand,
    applied: oneshot::Sender<()>,
}

/// Current-user projection shared with the UI.
///
/// Mutations are serialized through an actor task; reads go straight to the
/// `RwLock`. When a [`UserStore`] is attached the actor mirrors every change
/// to disk so the next launch can render before the first `user/me`.
#[derive(Clone)]
pub struct AppState {
    command_tx: Arc<Mutex<Option<mpsc::Sender<Envelope>>>>,
    user: Arc<RwLock<Option<User>>>,
    store: Option<Arc<UserStore>>,
}

impl AppState {
    /// In-memory state. The actor is spawned lazily on first update.
    pub fn new() -> Self {
        Self {
            command_tx: Arc::new(Mutex::new(None)),
            user: Arc::new(RwLock::new(None)),
            store: None,
        }
    }

    /// State mirrored to `store`.
    pub fn with_store(store: UserStore) -> Self {
        Self {
            store: Some(Arc::new(store)),
            ..Self::new()
        }
    }

    /// Seed the projection from the attached store.
    ///
    /// Returns the restored user, if any. A corrupt file is reported and the
    /// state stays signed out.
    pub async fn restore(&self) -> Result<Option<User>, EventhubError> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        let restored = store.load()?;
        if let Some(user) = &restored {
            info!("Restored stored user {} ({:?})", user.email, user.role);
        }
        *self.user.write().await = restored.clone();
        Ok(restored)
    }

    /// Apply a state command. Returns once the actor has applied it.
    pub async fn update(&self, cmd: StateCommand) -> Result<(), EventhubError> {
        let tx = self.sender().await;
        let (applied, done) = oneshot::channel();

        tx.send(Envelope {
            command: cmd,
            applied,
        })
        .await
        .map_err(|e| state_error(format!("State actor died: {e}")))?;

        done.await
            .map_err(|_| state_error("State actor dropped the command"))
    }

    /// Current user (read-only).
    pub async fn get_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.user.read().await.is_some()
    }

    async fn sender(&self) -> mpsc::Sender<Envelope> {
        let mut tx_guard = self.command_tx.lock().await;
        if let Some(tx) = tx_guard.as_ref() {
            return tx.clone();
        }

        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(state_actor(rx, Arc::clone(&self.user), self.store.clone()));
        *tx_guard = Some(tx.clone());
        info!("State actor spawned");
        tx
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[track_caller]
fn state_error(message: impl Into<String>) -> EventhubError {
    EventhubError::State {
        message: message.into(),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Owns every mutation of the projection and its stored copy.
async fn state_actor(
    mut command_rx: mpsc::Receiver<Envelope>,
    user: Arc<RwLock<Option<User>>>,
    store: Option<Arc<UserStore>>,
) {
    info!("State actor started");

    while let Some(Envelope { command, applied }) = command_rx.recv().await {
        match command {
            StateCommand::SetUser(new_user) => {
                let mut user_write = user.write().await;

                match user_write.as_ref() {
                    Some(existing) if existing.id != new_user.id => warn!(
                        "Replacing signed-in user {} with {}",
                        existing.email, new_user.email
                    ),
                    Some(_) => {}
                    None => info!("Signed in as {} ({:?})", new_user.email, new_user.role),
                }

                if let Some(store) = &store
                    && let Err(e) = store.save(&new_user)
                {
                    warn!("Failed to persist user: {e}");
                }

                *user_write = Some(new_user);
            }
            StateCommand::ClearUser => {
                let mut user_write = user.write().await;

                match user_write.take() {
                    Some(old) => info!("Clearing user {}", old.email),
                    None => warn!("Clear user requested but no user was set"),
                }

                if let Some(store) = &store
                    && let Err(e) = store.clear()
                {
                    warn!("Failed to clear stored user: {e}");
                }
            }
        }

        // The requester may have been cancelled; nothing to report then.
        let _ = applied.send(());
    }

    warn!("State actor stopped");
}
