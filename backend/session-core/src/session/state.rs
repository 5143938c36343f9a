//! Session state management using the actor pattern.
//!
//! All mutations of the session (token, profile, presence) are sent as
//! [`StateCommand`]s to a single task that applies them in receipt order.
//! Reads go through `Arc<RwLock<_>>` and never wait on the actor.
//!
//! # Epochs
//!
//! Every [`StateCommand::Clear`] bumps the session epoch. Commands produced by
//! work that started before the clear (an HTTP response, a presence push from
//! the old connection) carry the older epoch and are dropped, so a response
//! arriving after logout cannot bring the session back.

use crate::error::session::SessionError;

use common::{ErrorLocation, RedactedToken};
use models::{PresenceSet, UserId, UserProfile};

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};

const COMMAND_CHANNEL_CAPACITY: usize = 100;

/// Commands that mutate session state.
#[derive(Debug)]
pub enum StateCommand {
    /// Set token and profile together.
    SignIn {
        epoch: u64,
        token: RedactedToken,
        user: UserProfile,
    },

    /// Replace the profile of the signed-in user.
    SetUser { epoch: u64, user: UserProfile },

    /// Replace the online set with a server push received on `owner`'s connection.
    ReplacePresence {
        epoch: u64,
        owner: UserId,
        online: Vec<UserId>,
    },

    /// Drop token, profile and presence and start a new epoch.
    Clear,
}

struct Envelope {
    command: StateCommand,
    applied_tx: Option<oneshot::Sender<bool>>,
}

#[derive(Default)]
struct SessionData {
    epoch: u64,
    token: Option<RedactedToken>,
    user: Option<UserProfile>,
    online: PresenceSet,
}

/// Point-in-time copy of the session.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub epoch: u64,
    pub user: Option<UserProfile>,
    pub online: PresenceSet,
    pub has_token: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.has_token && self.user.is_some()
    }
}

/// Shared session state.
///
/// This type is `Clone`; all clones share the same underlying state and actor.
#[derive(Clone)]
pub struct SessionState {
    /// Channel to send mutation commands to the actor
    command_tx: Arc<Mutex<Option<mpsc::Sender<Envelope>>>>,

    data: Arc<RwLock<SessionData>>,

    /// Track if actor has been initialized
    actor_init: Arc<Mutex<bool>>,
}

impl SessionState {
    /// Create empty session state.
    ///
    /// The actor is spawned lazily on first mutation, so this can be called
    /// outside a runtime.
    pub fn new() -> Self {
        Self {
            command_tx: Arc::new(Mutex::new(None)),
            data: Arc::new(RwLock::new(SessionData::default())),
            actor_init: Arc::new(Mutex::new(false)),
        }
    }

    /// Send a command and wait until the actor has processed it.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the command changed the state, `Ok(false)` if it was
    /// dropped as stale.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::State`] if the actor is gone.
    pub async fn apply(&self, command: StateCommand) -> Result<bool, SessionError> {
        let (applied_tx, applied_rx) = oneshot::channel();

        self.send(Envelope {
            command,
            applied_tx: Some(applied_tx),
        })
        .await?;

        applied_rx.await.map_err(|e| SessionError::State {
            message: format!("State actor dropped acknowledgement: {e}"),
            location: ErrorLocation::caller(),
        })
    }

    /// Send a command without waiting for it to be processed.
    ///
    /// Ordering relative to other commands is still preserved.
    pub async fn post(&self, command: StateCommand) -> Result<(), SessionError> {
        self.send(Envelope {
            command,
            applied_tx: None,
        })
        .await
    }

    async fn send(&self, envelope: Envelope) -> Result<(), SessionError> {
        self.ensure_actor().await;

        let tx_guard = self.command_tx.lock().await;
        let tx = tx_guard.as_ref().ok_or_else(|| SessionError::State {
            message: "State actor not initialized".to_string(),
            location: ErrorLocation::caller(),
        })?;

        tx.send(envelope).await.map_err(|e| SessionError::State {
            message: format!("State actor died: {}", e),
            location: ErrorLocation::caller(),
        })
    }

    pub async fn epoch(&self) -> u64 {
        self.data.read().await.epoch
    }

    pub async fn token(&self) -> Option<RedactedToken> {
        self.data.read().await.token.clone()
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.data.read().await.user.clone()
    }

    pub async fn online_users(&self) -> PresenceSet {
        self.data.read().await.online.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let data = self.data.read().await;
        SessionSnapshot {
            epoch: data.epoch,
            user: data.user.clone(),
            online: data.online.clone(),
            has_token: data.token.is_some(),
        }
    }

    /// Ensure actor is spawned (called lazily from async context).
    async fn ensure_actor(&self) {
        let mut init_guard = self.actor_init.lock().await;
        if !*init_guard {
            let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
            let data_clone = Arc::clone(&self.data);

            // Store tx BEFORE spawning to avoid race
            let mut tx_guard = self.command_tx.lock().await;
            *tx_guard = Some(tx);
            drop(tx_guard);

            tokio::spawn(state_actor(rx, data_clone));
            *init_guard = true;
            debug!("Session state actor spawned");
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// The state actor task.
///
/// Owns all writes to the session and processes commands sequentially until
/// every [`SessionState`] handle is dropped.
async fn state_actor(mut command_rx: mpsc::Receiver<Envelope>, data: Arc<RwLock<SessionData>>) {
    debug!("Session state actor started");

    while let Some(Envelope {
        command,
        applied_tx,
    }) = command_rx.recv().await
    {
        let mut data_write = data.write().await;
        let applied = apply_command(&mut data_write, command);
        drop(data_write);

        if let Some(tx) = applied_tx {
            // The requester may have gone away; nothing to do then.
            let _ = tx.send(applied);
        }
    }

    debug!("Session state actor stopped");
}

fn apply_command(data: &mut SessionData, command: StateCommand) -> bool {
    match command {
        StateCommand::SignIn { epoch, token, user } => {
            if epoch != data.epoch {
                warn!(
                    "Dropping stale sign-in for {} (epoch {epoch}, current {})",
                    user.id, data.epoch
                );
                return false;
            }

            let previous = data.user.as_ref().map(|u| u.id.clone());
            if previous.as_ref().is_some_and(|id| *id != user.id) {
                info!("Replacing signed-in user with {}", user.id);
                data.online.clear();
            }

            info!("Session signed in as {} ({})", user.id, user.email);
            data.token = Some(token);
            data.user = Some(user);
            true
        }
        StateCommand::SetUser { epoch, user } => {
            if epoch != data.epoch {
                warn!("Dropping stale profile for {} (epoch {epoch}, current {})", user.id, data.epoch);
                return false;
            }

            match data.user {
                Some(ref existing) if existing.id == user.id => {
                    debug!("Profile updated for {}", user.id);
                    data.user = Some(user);
                    true
                }
                Some(ref existing) => {
                    warn!("Dropping profile for {}: session belongs to {}", user.id, existing.id);
                    false
                }
                None => {
                    warn!("Dropping profile for {}: no signed-in user", user.id);
                    false
                }
            }
        }
        StateCommand::ReplacePresence {
            epoch,
            owner,
            online,
        } => {
            let owned_by_current = data.user.as_ref().is_some_and(|u| u.id == owner);
            if epoch != data.epoch || !owned_by_current {
                debug!("Dropping presence push from stale connection of {owner}");
                return false;
            }

            debug!("Presence replaced: {} online", online.len());
            data.online.replace(online);
            true
        }
        StateCommand::Clear => {
            data.epoch += 1;
            data.token = None;
            data.user = None;
            data.online.clear();
            info!("Session cleared (epoch {})", data.epoch);
            true
        }
    }
}
