//! Data structures for the EventHub backend contract.
//!
//! Models carry no transport logic. Field names follow the backend's
//! camelCase JSON; enums follow its SCREAMING_CASE values.

pub mod dashboard;
pub mod error;
pub mod event;
pub mod event_form;
pub mod pagination;
pub mod participant;
pub mod user;

#[cfg(test)]
mod tests;

pub use common::ErrorLocation;

pub use dashboard::{AdminDashboardData, EventModeSplit, PopularEvent};
pub use error::model_error::ModelError;
pub use event::{Attachment, Event, EventQuery, EventType, Host, Organizer, Registration};
pub use event_form::{EventForm, EventFormBuilder, Upload};
pub use pagination::{ApiEnvelope, ApiMessage, PaginatedEvents, PaginatedParticipants, Pagination};
pub use participant::{
    EventSummary, Participant, ParticipantEvent, ParticipantStatus, ParticipantUser,
    ReviewDecision,
};
pub use user::{
    ForgotPasswordPayload, LoginPayload, LoginResponse, MeResponse, PasswordChange, Role,
    SignupPayload, User, UserInfoUpdate,
};
