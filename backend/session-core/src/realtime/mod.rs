//! Realtime connection to the chat backend.
//!
//! The link keeps at most one WebSocket open and models its lifecycle as an
//! explicit state machine:
//!
//! ```text
//!                connect(u)                 socket open
//! Disconnected ─────────────▶ Connecting(u) ─────────────▶ Connected(u)
//!      ▲                          │  connect failed            │
//!      └──────────────────────────┴────────────────────────────┘
//!                 disconnect() / server close / read error
//! ```
//!
//! `connect(u)` while `Connecting(u)` or `Connected(u)` is a no-op.
//! `connect(v)` while connected as `u` closes the `u` socket first.

mod connection;
mod link;

pub use link::{ConnectOutcome, LinkStatus, RealtimeLink, realtime_endpoint};

use models::UserId;

use futures_util::future::BoxFuture;

/// Query parameter carrying the owning user's id.
pub const USER_ID_QUERY_KEY: &str = "userId";

/// Receives presence pushes from an open connection, in receipt order.
pub trait PresenceSink: Send + Sync + 'static {
    fn replace_online(&self, online: Vec<UserId>) -> BoxFuture<'_, ()>;
}
