use eventhub::error::EventhubError;
use eventhub::logger::initialize as LoggerInitialize;
use eventhub::session::sync_current_user;
use eventhub::state::AppState;

use client_core::{AuthService, EventService, Gateway, GatewayConfig, UserStore};
use common::ErrorLocation;
use models::EventQuery;

use std::env;
use std::fs::create_dir_all;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};

const APP_DIR_NAME: &str = "eventhub";

#[tokio::main]
async fn main() -> Result<(), EventhubError> {
    let data_dir = data_dir();
    let log_dir = data_dir.join("logs");

    create_dir_all(&log_dir).map_err(|e| EventhubError::Eventhub {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir)?;

    info!("EventHub client starting");
    info!("Data directory: {}", data_dir.display());

    let config = GatewayConfig::from_env()?;
    let gateway = Arc::new(Gateway::new(&config)?);
    let auth = AuthService::new(Arc::clone(&gateway));
    let events = EventService::new(Arc::clone(&gateway));

    let state = AppState::with_store(UserStore::new(&data_dir));
    if let Err(e) = state.restore().await {
        warn!("Ignoring unreadable stored user: {e}");
    }

    match sync_current_user(&state, &auth).await {
        Ok(Some(user)) => info!("Signed in as {} ({:?})", user.full_name, user.role),
        Ok(None) => info!("Not signed in"),
        Err(e) => warn!("Startup sync failed, keeping last known user: {e}"),
    }

    let page = events.list(&EventQuery::default()).await?;
    info!(
        "Loaded {} of {} events (page {}/{})",
        page.data.len(),
        page.pagination.total,
        page.pagination.page,
        page.pagination.total_pages
    );
    for event in &page.data {
        info!("  {} [{}] {}", event.start_at, event.event_type.as_str(), event.title);
    }

    info!(
        "Refresh episodes this run: {}",
        gateway.refresh_episodes()
    );
    Ok(())
}

/// Per-user data directory, or the system temp dir when none is known.
fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(env::temp_dir)
        .join(APP_DIR_NAME)
}
