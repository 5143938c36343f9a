use crate::error::realtime::RealtimeError;
use crate::realtime::connection::{Connection, WsStream};
use crate::realtime::{PresenceSink, USER_ID_QUERY_KEY};

use common::ErrorLocation;
use models::UserId;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio::time::sleep as TokioSleep;
use tokio_tungstenite::connect_async;
use url::Url;

pub(crate) enum LinkState {
    Disconnected,
    Connecting {
        user_id: UserId,
        attempt: u64,
    },
    Connected {
        user_id: UserId,
        attempt: u64,
        connection: Connection,
    },
}

/// Observable state of the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connecting(UserId),
    Connected(UserId),
}

/// What a `connect` call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new socket is open.
    Opened,
    /// A socket for this user was already open or opening; nothing changed.
    AlreadyOpen,
    /// A later `connect`/`disconnect` overtook this attempt; its socket was closed.
    Superseded,
    /// Nothing to connect (no signed-in user).
    Skipped,
}

/// Single-connection realtime link.
pub struct RealtimeLink {
    endpoint: Url,
    connect_max_elapsed: Duration,
    state: Arc<Mutex<LinkState>>,
    attempts: AtomicU64,
}

/// Builds the WebSocket endpoint from the HTTP base URL: `http` becomes
/// `ws`, `https` becomes `wss`, and `path` is resolved against the base.
#[track_caller]
pub fn realtime_endpoint(base_url: &Url, path: &str) -> Result<Url, RealtimeError> {
    let mut url = base_url.join(path.trim_start_matches('/'))?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(RealtimeError::Url {
                message: format!("Unsupported backend scheme: {other}"),
                location: ErrorLocation::caller(),
            });
        }
    };

    url.set_scheme(scheme).map_err(|_| RealtimeError::Url {
        message: format!("Cannot switch {url} to {scheme}"),
        location: ErrorLocation::caller(),
    })?;

    url.set_query(None);
    Ok(url)
}

impl RealtimeLink {
    pub fn new(endpoint: Url, connect_max_elapsed: Duration) -> Self {
        Self {
            endpoint,
            connect_max_elapsed,
            state: Arc::new(Mutex::new(LinkState::Disconnected)),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn status(&self) -> LinkStatus {
        match &*self.state.lock().await {
            LinkState::Disconnected => LinkStatus::Disconnected,
            LinkState::Connecting { user_id, .. } => LinkStatus::Connecting(user_id.clone()),
            LinkState::Connected { user_id, .. } => LinkStatus::Connected(user_id.clone()),
        }
    }

    fn url_for(&self, user_id: &UserId) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(USER_ID_QUERY_KEY, user_id.as_str());
        url
    }

    /// Open the link for `user_id`, delivering presence pushes to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeError::Connect`] once the retry budget is spent; the
    /// link is back in `Disconnected` then.
    pub async fn connect(
        &self,
        user_id: &UserId,
        sink: Arc<dyn PresenceSink>,
    ) -> Result<ConnectOutcome, RealtimeError> {
        let url = self.url_for(user_id);

        let (attempt, previous) = {
            let mut state = self.state.lock().await;

            match &*state {
                LinkState::Connecting { user_id: current, .. }
                | LinkState::Connected { user_id: current, .. }
                    if current == user_id =>
                {
                    debug!("Realtime link already open for {user_id}");
                    return Ok(ConnectOutcome::AlreadyOpen);
                }
                _ => {}
            }

            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            let previous = std::mem::replace(
                &mut *state,
                LinkState::Connecting {
                    user_id: user_id.clone(),
                    attempt,
                },
            );
            (attempt, previous)
        };

        match previous {
            LinkState::Connected {
                user_id: previous_user,
                connection,
                ..
            } => {
                info!("Closing realtime link for {previous_user} before connecting as {user_id}");
                connection.close().await;
            }
            LinkState::Connecting {
                user_id: previous_user,
                ..
            } => {
                info!("Abandoning realtime connect for {previous_user} in favour of {user_id}");
            }
            LinkState::Disconnected => {}
        }

        info!("Opening realtime link for {user_id}");

        let ws = match self.open_socket(&url).await {
            Ok(ws) => ws,
            Err(e) => {
                let mut state = self.state.lock().await;
                if matches!(&*state, LinkState::Connecting { attempt: a, .. } if *a == attempt) {
                    *state = LinkState::Disconnected;
                }
                warn!("Realtime connect for {user_id} failed: {e}");
                return Err(e);
            }
        };

        let mut state = self.state.lock().await;

        if !matches!(&*state, LinkState::Connecting { attempt: a, .. } if *a == attempt) {
            drop(state);
            info!("Realtime connect for {user_id} was superseded; closing its socket");
            let mut ws = ws;
            if let Err(e) = ws.close(None).await {
                debug!("Closing superseded socket failed: {e}");
            }
            return Ok(ConnectOutcome::Superseded);
        }

        let connection = Connection::spawn(
            ws,
            user_id.clone(),
            sink,
            Arc::clone(&self.state),
            attempt,
        );
        *state = LinkState::Connected {
            user_id: user_id.clone(),
            attempt,
            connection,
        };

        info!("Realtime link connected for {user_id}");
        Ok(ConnectOutcome::Opened)
    }

    /// Close the link if open and abandon any in-flight connect.
    ///
    /// Returns once the connection task has finished.
    pub async fn disconnect(&self) -> bool {
        let previous = {
            let mut state = self.state.lock().await;
            std::mem::replace(&mut *state, LinkState::Disconnected)
        };

        match previous {
            LinkState::Connected {
                user_id,
                connection,
                ..
            } => {
                connection.close().await;
                info!("Realtime link for {user_id} closed");
                true
            }
            LinkState::Connecting { user_id, .. } => {
                info!("Realtime connect for {user_id} abandoned");
                false
            }
            LinkState::Disconnected => {
                debug!("Realtime disconnect requested but link was not open");
                false
            }
        }
    }

    async fn open_socket(&self, url: &Url) -> Result<WsStream, RealtimeError> {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.connect_max_elapsed),
            ..Default::default()
        };

        loop {
            match connect_async(url.as_str()).await {
                Ok((ws, _response)) => return Ok(ws),
                Err(e) => match backoff.next_backoff() {
                    Some(duration) => {
                        debug!("Realtime connect failed ({e}), retrying after {duration:?}");
                        TokioSleep(duration).await;
                    }
                    None => return Err(RealtimeError::from(e)),
                },
            }
        }
    }
}
