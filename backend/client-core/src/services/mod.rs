//! Thin wrappers over backend endpoints.
//!
//! Services own no state beyond a shared [`Gateway`](crate::gateway::Gateway);
//! session recovery is entirely the gateway's concern.

pub mod auth;
pub mod event;
pub mod participant;

pub use auth::AuthService;
pub use event::EventService;
pub use participant::ParticipantService;
