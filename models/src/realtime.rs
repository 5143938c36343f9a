//! Frames pushed over the realtime channel.
//!
//! Every text frame is a JSON object `{ "event": <name>, "data": <payload> }`.

use crate::UserId;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event carrying the complete list of online user ids.
pub const ONLINE_USERS_EVENT: &str = "getOnlineUsers";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

/// Decoded realtime event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    OnlineUsers(Vec<UserId>),
    /// Any event this client does not handle; carries the event name.
    Other(String),
}

impl RealtimeFrame {
    pub fn online_users(ids: &[UserId]) -> Self {
        Self {
            event: ONLINE_USERS_EVENT.to_string(),
            data: serde_json::to_value(ids).unwrap_or(Value::Array(Vec::new())),
        }
    }

    /// Decodes the payload for known events.
    pub fn into_event(self) -> Result<RealtimeEvent, serde_json::Error> {
        match self.event.as_str() {
            ONLINE_USERS_EVENT => {
                let ids: Vec<UserId> = serde_json::from_value(self.data)?;
                Ok(RealtimeEvent::OnlineUsers(ids))
            }
            _ => Ok(RealtimeEvent::Other(self.event)),
        }
    }
}
