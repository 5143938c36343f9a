//! Client-side session lifecycle for the chat backend.
//!
//! [`SessionManager`] owns the session token, the signed-in user's profile,
//! the presence set and the single realtime link, and exposes the
//! operations that change them: restore, login, logout, profile update and
//! realtime connect.

pub mod auth_client;
pub mod config;
pub mod error;
pub mod notify;
pub mod realtime;
pub mod session;
pub mod token_store;

#[cfg(test)]
mod tests;

pub use auth_client::{AuthClient, AuthGrant};
pub use config::ClientConfig;
pub use error::CoreError;
pub use notify::{LogNotifier, Notice, Notifier, RecordingNotifier};
pub use realtime::{ConnectOutcome, LinkStatus};
pub use session::{Outcome, RestoreOutcome, SessionManager, SessionSnapshot};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
