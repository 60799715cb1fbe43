//! Shared primitives for the EventHub client workspace.
//!
//! Everything here is dependency-light and used by every other crate:
//!
//! - **ErrorLocation**: call-site capture attached to every error variant
//! - **HttpStatusCode**: status classification used by the request gateway
//! - **RedactedSecret**: passwords and reset tokens that never reach logs
//!
//! ## Architecture
//!
//! - **common** (this crate): primitives
//! - **models**: backend contract data structures
//! - **client-core**: request gateway, refresh coordination, services
//! - **eventhub**: application wiring everything together

pub mod error;
pub mod http_status;
pub mod redacted_secret;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;
