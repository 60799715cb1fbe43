pub mod config;
pub mod error;
pub mod gateway;
pub mod services;
pub mod session;

#[cfg(test)]
mod tests;

pub use config::GatewayConfig;
pub use error::{ConfigError, CoreError, GatewayError, SessionError};
pub use gateway::{ApiRequest, ApiResponse, FormPart, Gateway, RefreshRejection};
pub use services::{AuthService, EventService, ParticipantService};
pub use session::UserStore;

pub const EVENTHUB_API_HOSTNAME: &str = "localhost";
pub const EVENTHUB_API_PORT: &str = "5000";
pub const DEFAULT_API_BASE_URL: &str =
    const_format::concatcp!("http://", EVENTHUB_API_HOSTNAME, ":", EVENTHUB_API_PORT, "/api");
