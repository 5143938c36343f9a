//! Minimal realtime endpoint: accepts WebSocket upgrades, records the
//! `userId` query of each one and lets tests push frames to clients.

use models::RealtimeFrame;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

pub const SOCKET_PATH: &str = "/socket";

struct ClientRecord {
    user_id: Option<String>,
    path: String,
    outbound: mpsc::UnboundedSender<Message>,
}

#[derive(Default)]
struct Shared {
    clients: Mutex<Vec<ClientRecord>>,
    open: AtomicUsize,
}

pub struct SocketServer {
    port: u16,
    shared: Arc<Shared>,
    accept_task: JoinHandle<()>,
}

impl SocketServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind socket server");
        let port = listener
            .local_addr()
            .expect("Socket server has no address")
            .port();

        let shared = Arc::new(Shared::default());
        let accept_task = tokio::spawn(accept_loop(listener, Arc::clone(&shared)));

        Self {
            port,
            shared,
            accept_task,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://127.0.0.1:{}{}", self.port, SOCKET_PATH)
    }

    /// Connections accepted so far, open or not.
    pub fn connection_count(&self) -> usize {
        self.clients().len()
    }

    pub fn open_count(&self) -> usize {
        self.shared.open.load(Ordering::SeqCst)
    }

    /// `userId` query of every accepted connection, in accept order.
    pub fn user_ids(&self) -> Vec<Option<String>> {
        self.clients().iter().map(|c| c.user_id.clone()).collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.clients().iter().map(|c| c.path.clone()).collect()
    }

    /// Sends `frame` to the most recently accepted connection.
    pub fn push_latest(&self, frame: &RealtimeFrame) {
        let text = serde_json::to_string(frame).expect("Failed to encode frame");
        self.send_latest(Message::Text(text.into()));
    }

    pub fn push_raw_latest(&self, text: &str) {
        self.send_latest(Message::Text(text.to_string().into()));
    }

    /// Server-initiated close of the most recently accepted connection.
    pub fn close_latest(&self) {
        self.send_latest(Message::Close(None));
    }

    fn send_latest(&self, message: Message) {
        let clients = self.clients();
        let latest = clients.last().expect("No connection accepted yet");
        latest
            .outbound
            .send(message)
            .expect("Connection task already finished");
    }

    fn clients(&self) -> std::sync::MutexGuard<'_, Vec<ClientRecord>> {
        self.shared.clients.lock().expect("Client list poisoned")
    }
}

impl Drop for SocketServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

async fn accept_loop(listener: TcpListener, shared: Arc<Shared>) {
    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(serve(stream, Arc::clone(&shared)));
    }
}

async fn serve(stream: TcpStream, shared: Arc<Shared>) {
    let mut user_id = None;
    let mut path = String::new();

    let callback = |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        path = request.uri().path().to_string();
        user_id = request.uri().query().and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == "userId")
                .map(|(_, value)| value.into_owned())
        });
        Ok(response)
    };

    let Ok(mut ws) = accept_hdr_async(stream, callback).await else {
        return;
    };

    let (outbound, mut outbound_rx) = mpsc::unbounded_channel();
    shared.open.fetch_add(1, Ordering::SeqCst);
    shared
        .clients
        .lock()
        .expect("Client list poisoned")
        .push(ClientRecord {
            user_id,
            path,
            outbound,
        });

    loop {
        tokio::select! {
            Some(message) = outbound_rx.recv() => {
                let closing = matches!(message, Message::Close(_));
                if ws.send(message).await.is_err() || closing {
                    break;
                }
            }
            incoming = ws.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    shared.open.fetch_sub(1, Ordering::SeqCst);
}
