//! Domain models for the chat session client.
//!
//! This crate contains pure data structures shared by the session client,
//! the token issuer, and the terminal front end. Models carry validation but
//! no I/O.
//!
//! ## Architecture
//!
//! - **models** (this crate): users, credentials, presence, wire envelopes
//! - **session-core**: session lifecycle operating on these models
//! - **chat-session**: application wiring everything together

pub mod api;
pub mod auth;
pub mod error;
pub mod presence;
pub mod profile_update;
pub mod realtime;
pub mod user;

pub use api::ApiResponse;
pub use auth::{AuthMode, Credentials};
pub use error::model_error::ModelError;
pub use presence::PresenceSet;
pub use profile_update::ProfileUpdate;
pub use profile_update::builder::ProfileUpdateBuilder;
pub use realtime::{ONLINE_USERS_EVENT, RealtimeEvent, RealtimeFrame};
pub use user::{UserId, UserProfile};

#[cfg(test)]
mod tests;
