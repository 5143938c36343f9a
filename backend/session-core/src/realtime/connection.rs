//! Task owning one open WebSocket.

use crate::realtime::PresenceSink;
use crate::realtime::link::LinkState;

use models::{RealtimeEvent, RealtimeFrame, UserId};

use std::sync::Arc;

use futures_util::StreamExt;
use log::{debug, info, warn};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handle to a running connection task.
pub(crate) struct Connection {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Connection {
    pub(crate) fn spawn(
        ws: WsStream,
        user_id: UserId,
        sink: Arc<dyn PresenceSink>,
        link_state: Arc<Mutex<LinkState>>,
        attempt: u64,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run(ws, shutdown_rx, user_id, sink, link_state, attempt));
        Self { shutdown_tx, task }
    }

    /// Send a close frame and wait for the task to finish.
    pub(crate) async fn close(self) {
        // Err means the task already exited on its own.
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            warn!("Realtime connection task ended abnormally: {e}");
        }
    }
}

async fn run(
    mut ws: WsStream,
    mut shutdown_rx: oneshot::Receiver<()>,
    user_id: UserId,
    sink: Arc<dyn PresenceSink>,
    link_state: Arc<Mutex<LinkState>>,
    attempt: u64,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                if let Err(e) = ws.close(None).await {
                    debug!("Close handshake for {user_id} failed: {e}");
                }
                return;
            }
            message = ws.next() => match message {
                Some(Ok(Message::Text(text))) => handle_text(&text, sink.as_ref()).await,
                Some(Ok(Message::Close(frame))) => {
                    info!("Server closed realtime link for {user_id}: {frame:?}");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Realtime link for {user_id} failed: {e}");
                    break;
                }
                None => {
                    info!("Realtime link for {user_id} ended");
                    break;
                }
            }
        }
    }

    // Presence from a dead link is stale. Clear it while the state is still
    // ours so a reconnect that lands next cannot have its list wiped.
    let mut state = link_state.lock().await;
    if matches!(&*state, LinkState::Connected { attempt: a, .. } if *a == attempt) {
        sink.replace_online(Vec::new()).await;
        *state = LinkState::Disconnected;
    }
}

async fn handle_text(text: &str, sink: &dyn PresenceSink) {
    let frame: RealtimeFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Ignoring malformed realtime frame: {e}");
            return;
        }
    };

    match frame.into_event() {
        Ok(RealtimeEvent::OnlineUsers(online)) => sink.replace_online(online).await,
        Ok(RealtimeEvent::Other(event)) => debug!("Ignoring realtime event '{event}'"),
        Err(e) => warn!("Ignoring realtime frame with bad payload: {e}"),
    }
}
