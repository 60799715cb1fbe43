//! Gateway configuration.
//!
//! Sources, in the order the application consults them:
//! 1. `GatewayConfig::from_env()` - `.env` plus process environment
//! 2. `GatewayConfig::load(path)` - an optional TOML file
//! 3. Defaults pointing at a local backend

use crate::DEFAULT_API_BASE_URL;
use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

pub const API_URL_ENV: &str = "EVENTHUB_API_URL";
pub const REFRESH_PATH_ENV: &str = "EVENTHUB_REFRESH_PATH";
pub const REFRESH_TIMEOUT_ENV: &str = "EVENTHUB_REFRESH_TIMEOUT_MS";

const DEFAULT_REFRESH_PATH: &str = "auth/refresh";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_REFRESH_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_QUEUE_TIMEOUT_MS: u64 = 20_000;

// ============================================
// CONFIG STRUCT
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Refresh endpoint, relative to `base_url`.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,

    /// Upper bound for any single HTTP exchange.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Upper bound for the refresh call; an episode that exceeds it fails.
    #[serde(default = "default_refresh_timeout_ms")]
    pub refresh_timeout_ms: u64,

    /// Upper bound for how long a queued request waits on an episode.
    #[serde(default = "default_queue_timeout_ms")]
    pub queue_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_path: default_refresh_path(),
            request_timeout_ms: default_request_timeout_ms(),
            refresh_timeout_ms: default_refresh_timeout_ms(),
            queue_timeout_ms: default_queue_timeout_ms(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_refresh_path() -> String {
    DEFAULT_REFRESH_PATH.to_string()
}
fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}
fn default_refresh_timeout_ms() -> u64 {
    DEFAULT_REFRESH_TIMEOUT_MS
}
fn default_queue_timeout_ms() -> u64 {
    DEFAULT_QUEUE_TIMEOUT_MS
}

// ============================================
// IMPLEMENTATION
// ============================================

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout_ms = saturating_millis(timeout);
        self
    }

    pub fn with_queue_timeout(mut self, timeout: Duration) -> Self {
        self.queue_timeout_ms = saturating_millis(timeout);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }

    pub fn queue_timeout(&self) -> Duration {
        Duration::from_millis(self.queue_timeout_ms)
    }

    /// Build config from `.env` and the process environment.
    ///
    /// A missing `.env` is not an error; unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set but unusable, or if the
    /// resulting config fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {:?}", path),
            Err(_) => debug!("No .env file found - using process environment"),
        }

        let mut config = Self::default();

        if let Some(url) = read_env(API_URL_ENV)? {
            config.base_url = url;
        }

        if let Some(path) = read_env(REFRESH_PATH_ENV)? {
            config.refresh_path = path;
        }

        if let Some(raw) = read_env(REFRESH_TIMEOUT_ENV)? {
            config.refresh_timeout_ms = raw.parse().map_err(|_| ConfigError::EnvError {
                location: ErrorLocation::from(Location::caller()),
                name: REFRESH_TIMEOUT_ENV.to_string(),
                reason: format!("expected milliseconds, got '{raw}'"),
            })?;
        }

        config.validate()?;
        info!("Gateway configured for {}", config.base_url);
        Ok(config)
    }

    /// Load config from a TOML file.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file does not exist.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable or invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "Gateway config not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            warn!("Failed to read gateway config: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        let config: GatewayConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse gateway config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Gateway config loaded from {}", path.display());
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid base URL format: {}", self.base_url),
            });
        }

        if let Err(e) = Url::parse(&self.base_url) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid base URL {}: {}", self.base_url, e),
            });
        }

        if self.refresh_path.trim_matches('/').is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "refresh_path cannot be empty".to_string(),
            });
        }

        if self.request_timeout_ms == 0 || self.refresh_timeout_ms == 0 || self.queue_timeout_ms == 0
        {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "timeouts must be non-zero".to_string(),
            });
        }

        if self.queue_timeout_ms < self.refresh_timeout_ms {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "queue_timeout_ms ({}) shorter than refresh_timeout_ms ({})",
                    self.queue_timeout_ms, self.refresh_timeout_ms
                ),
            });
        }

        Ok(())
    }

    /// Base URL with a guaranteed trailing slash, so relative request paths
    /// resolve under the API prefix instead of replacing its last segment.
    pub fn normalized_base_url(&self) -> Result<Url, url::ParseError> {
        if self.base_url.ends_with('/') {
            Url::parse(&self.base_url)
        } else {
            Url::parse(&format!("{}/", self.base_url))
        }
    }
}

/// Durations beyond `u64::MAX` milliseconds clamp rather than wrap.
fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[track_caller]
fn read_env(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::EnvError {
            location: ErrorLocation::from(Location::caller()),
            name: name.to_string(),
            reason: "contains invalid unicode".to_string(),
        }),
    }
}
