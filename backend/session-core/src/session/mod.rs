//! Session manager: the single owner of the client's authentication state.
//!
//! The application's composition root creates one [`SessionManager`] and
//! passes it by reference to whatever drives user actions. Every change to
//! token, profile, presence or the realtime link goes through the operations
//! below; none of them return an error to the caller. Failures become an
//! [`Outcome::Failure`] plus an error [`Notice`].

mod outcome;
pub mod state;

pub use outcome::{Outcome, RestoreOutcome};
pub use state::{SessionSnapshot, SessionState, StateCommand};

use crate::auth_client::AuthClient;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::error::realtime::RealtimeError;
use crate::notify::{Notice, Notifier};
use crate::realtime::{ConnectOutcome, LinkStatus, PresenceSink, RealtimeLink, realtime_endpoint};
use crate::token_store::TokenStore;

use models::{AuthMode, Credentials, PresenceSet, ProfileUpdate, UserId, UserProfile};

use std::sync::Arc;

use futures_util::future::BoxFuture;
use log::{debug, error, info, warn};
use url::Url;

const LOGOUT_MESSAGE: &str = "Logged out successfully";
const PROFILE_UPDATED_MESSAGE: &str = "Profile updated successfully";
const SESSION_CHANGED_MESSAGE: &str = "Session changed before the request completed";

pub struct SessionManager<S, N> {
    api: AuthClient,
    store: S,
    notifier: N,
    state: SessionState,
    realtime: RealtimeLink,
}

impl<S, N> SessionManager<S, N>
where
    S: TokenStore,
    N: Notifier,
{
    /// Build a manager for the backend described by `config`.
    ///
    /// Nothing is contacted until [`SessionManager::restore`] or an operation runs.
    pub fn new(config: &ClientConfig, store: S, notifier: N) -> Result<Self, CoreError> {
        config.validate()?;

        let api = AuthClient::with_timeout(&config.server.base_url, config.request_timeout())?;
        let endpoint = match &config.realtime.url {
            Some(url) => {
                let url = Url::parse(url).map_err(RealtimeError::from)?;
                realtime_endpoint(&url, "")?
            }
            None => realtime_endpoint(api.base_url(), &config.realtime.path)?,
        };
        let realtime = RealtimeLink::new(endpoint, config.connect_max_elapsed());

        info!(
            "Session manager for {} (realtime at {})",
            api.base_url(),
            realtime.endpoint()
        );

        Ok(Self {
            api,
            store,
            notifier,
            state: SessionState::new(),
            realtime,
        })
    }

    // ============================================
    // OPERATIONS
    // ============================================

    /// Validate a persisted token with the server and resume its session.
    ///
    /// Never notifies. A token the server refuses (`success: false`, 401 or
    /// 403) is removed from the store. Any other failure, including a 5xx
    /// reply, leaves the token in place for the next start.
    pub async fn restore(&self) -> RestoreOutcome {
        let token = match self.store.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No persisted token; starting signed out");
                return RestoreOutcome::NoToken;
            }
            Err(e) => {
                warn!("Could not read persisted token: {e}");
                return RestoreOutcome::NoToken;
            }
        };

        let epoch = self.state.epoch().await;

        let user = match self.api.check(&token).await {
            Ok(user) => user,
            Err(e) if e.is_credential_refusal() => {
                info!("Persisted token rejected by server: {}", e.user_message());
                self.clear_store();
                return RestoreOutcome::Rejected;
            }
            Err(e) if e.is_server_error() => {
                warn!("Auth check hit a server error, keeping token: {e}");
                return RestoreOutcome::Unreachable;
            }
            Err(e) if e.is_rejection() => {
                warn!("Auth check answered unexpectedly, keeping token: {e}");
                return RestoreOutcome::Unreachable;
            }
            Err(e) => {
                warn!("Auth check failed: {e}");
                return RestoreOutcome::Unreachable;
            }
        };

        match self
            .state
            .apply(StateCommand::SignIn {
                epoch,
                token,
                user: user.clone(),
            })
            .await
        {
            Ok(true) => {}
            Ok(false) => return RestoreOutcome::Superseded,
            Err(e) => {
                error!("Could not record restored session: {e}");
                return RestoreOutcome::Unreachable;
            }
        }

        info!("Session restored for {}", user.id);
        self.connect_logged(&user).await;
        RestoreOutcome::Restored(user)
    }

    /// Sign up or log in, then open the realtime link.
    pub async fn login(&self, mode: AuthMode, credentials: &Credentials) -> Outcome {
        let epoch = self.state.epoch().await;

        let grant = match self.api.authenticate(mode, credentials).await {
            Ok(grant) => grant,
            Err(e) => {
                warn!("{mode} failed: {e}");
                return self.fail(e.user_message());
            }
        };

        match self
            .state
            .apply(StateCommand::SignIn {
                epoch,
                token: grant.token.clone(),
                user: grant.user.clone(),
            })
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                info!("Discarding {mode} response: session was cleared while it was in flight");
                return Outcome::failure(SESSION_CHANGED_MESSAGE);
            }
            Err(e) => {
                error!("Could not record {mode} result: {e}");
                return self.fail(SESSION_CHANGED_MESSAGE);
            }
        }

        if let Err(e) = self.store.save(&grant.token) {
            warn!("Session token could not be persisted: {e}");
        }

        // A logout that ran while the token was being written must win.
        if self.state.epoch().await != epoch {
            self.clear_store();
            return Outcome::failure(SESSION_CHANGED_MESSAGE);
        }

        let message = grant.message.filter(|m| !m.is_empty()).unwrap_or_else(|| {
            match mode {
                AuthMode::SignUp => "Account created successfully",
                AuthMode::Login => "Login successful",
            }
            .to_string()
        });
        self.notifier.notify(Notice::Success(message));

        // The user is signed in whether or not the link comes up.
        self.connect_logged(&grant.user).await;

        Outcome::Success
    }

    /// Clear the session locally and close the realtime link. Always succeeds.
    pub async fn logout(&self) -> Outcome {
        if let Err(e) = self.state.apply(StateCommand::Clear).await {
            error!("Could not clear session state: {e}");
        }

        self.clear_store();
        self.realtime.disconnect().await;

        self.notifier
            .notify(Notice::Success(LOGOUT_MESSAGE.to_string()));
        Outcome::Success
    }

    /// Submit profile changes and replace the in-memory profile on success.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Outcome {
        let epoch = self.state.epoch().await;
        let token = self.state.token().await;

        let user = match self.api.update_profile(token.as_ref(), update).await {
            Ok(user) => user,
            Err(e) => {
                warn!("Profile update failed: {e}");
                return self.fail(e.user_message());
            }
        };

        match self.state.apply(StateCommand::SetUser { epoch, user }).await {
            Ok(true) => {
                self.notifier
                    .notify(Notice::Success(PROFILE_UPDATED_MESSAGE.to_string()));
                Outcome::Success
            }
            Ok(false) => Outcome::failure(SESSION_CHANGED_MESSAGE),
            Err(e) => {
                error!("Could not record profile update: {e}");
                self.fail(SESSION_CHANGED_MESSAGE)
            }
        }
    }

    /// Open the realtime link for `user`.
    ///
    /// No-op without a user, or when `user` is not the signed-in user, or when
    /// a link for this user is already open or opening.
    pub async fn connect_realtime(
        &self,
        user: Option<&UserProfile>,
    ) -> Result<ConnectOutcome, RealtimeError> {
        let Some(user) = user else {
            return Ok(ConnectOutcome::Skipped);
        };

        let snapshot = self.state.snapshot().await;
        if snapshot.user.as_ref().map(|u| &u.id) != Some(&user.id) {
            warn!("Not connecting realtime for {}: not the signed-in user", user.id);
            return Ok(ConnectOutcome::Skipped);
        }

        let sink = Arc::new(SessionPresence {
            state: self.state.clone(),
            epoch: snapshot.epoch,
            owner: user.id.clone(),
        });

        let outcome = self.realtime.connect(&user.id, sink).await?;

        if outcome == ConnectOutcome::Opened && self.state.epoch().await != snapshot.epoch {
            info!("Session cleared while realtime link was opening; closing it");
            self.realtime.disconnect().await;
            return Ok(ConnectOutcome::Superseded);
        }

        Ok(outcome)
    }

    /// Reopen the realtime link for the signed-in user after it dropped.
    pub async fn reconnect_realtime(&self) -> Result<ConnectOutcome, RealtimeError> {
        let user = self.state.current_user().await;
        self.connect_realtime(user.as_ref()).await
    }

    /// Close the realtime link without touching the session (application exit).
    pub async fn shutdown(&self) {
        self.realtime.disconnect().await;
    }

    // ============================================
    // READS
    // ============================================

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.state.current_user().await
    }

    pub async fn online_users(&self) -> PresenceSet {
        self.state.online_users().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.snapshot().await.is_authenticated()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot().await
    }

    pub async fn realtime_status(&self) -> LinkStatus {
        self.realtime.status().await
    }

    // ============================================
    // HELPERS
    // ============================================

    async fn connect_logged(&self, user: &UserProfile) {
        match self.connect_realtime(Some(user)).await {
            Ok(outcome) => debug!("Realtime connect for {}: {outcome:?}", user.id),
            Err(e) => warn!("Realtime link unavailable for {}: {e}", user.id),
        }
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Persisted token could not be removed: {e}");
        }
    }

    fn fail(&self, message: &str) -> Outcome {
        self.notifier.notify(Notice::Error(message.to_string()));
        Outcome::failure(message)
    }
}

/// Feeds presence pushes of one connection into the session state.
struct SessionPresence {
    state: SessionState,
    epoch: u64,
    owner: UserId,
}

impl PresenceSink for SessionPresence {
    fn replace_online(&self, online: Vec<UserId>) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let command = StateCommand::ReplacePresence {
                epoch: self.epoch,
                owner: self.owner.clone(),
                online,
            };
            if let Err(e) = self.state.post(command).await {
                warn!("Presence update lost: {e}");
            }
        })
    }
}
