//! Test helpers for session integration tests.
//!
//! - A wiremock backend for the `/api/auth/*` endpoints
//! - A WebSocket server standing in for the realtime endpoint
//! - Polling helpers for state that settles asynchronously

mod socket_server;

pub use socket_server::SocketServer;

use session_core::{ClientConfig, MemoryTokenStore, RecordingNotifier, SessionManager};

use models::UserId;
use token_issuer::TokenIssuer;

use std::future::Future;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::MockServer;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const ALICE_ID: &str = "64f0c0ffee0000000000a11c";
pub const BOB_ID: &str = "64f0c0ffee0000000000b0b0";

const WAIT_TIMEOUT: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub type TestSession = SessionManager<MemoryTokenStore, RecordingNotifier>;

/// Mock HTTP backend plus realtime server.
pub struct TestBackend {
    pub http: MockServer,
    pub socket: SocketServer,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self {
            http: MockServer::start().await,
            socket: SocketServer::start().await,
        }
    }

    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.server.base_url = self.http.uri();
        config.server.request_timeout_secs = 5;
        config.realtime.url = Some(self.socket.url());
        config.realtime.connect_max_elapsed_ms = 500;
        config
    }

    /// Session wired to this backend; the store and notifier are clones the test keeps.
    pub fn session(&self, store: &MemoryTokenStore, notifier: &RecordingNotifier) -> TestSession {
        SessionManager::new(&self.config(), store.clone(), notifier.clone())
            .expect("Failed to build session manager")
    }
}

pub fn mint_token(user_id: &str) -> String {
    TokenIssuer::new(TEST_SECRET)
        .expect("Failed to build issuer")
        .generate_token(&UserId::from(user_id))
        .expect("Failed to sign token")
}

pub fn user_json(id: &str, full_name: &str) -> Value {
    let first = full_name
        .split_whitespace()
        .next()
        .unwrap_or(full_name)
        .to_lowercase();
    json!({
        "_id": id,
        "email": format!("{first}@example.com"),
        "fullName": full_name,
        "profilePic": "",
        "bio": "Hi everyone, I am using QuickChat",
    })
}

pub fn alice_json() -> Value {
    user_json(ALICE_ID, "Alice Smith")
}

pub fn bob_json() -> Value {
    user_json(BOB_ID, "Bob Jones")
}

/// Body of a successful signup/login response.
pub fn auth_success_body(user: Value, token: &str, message: &str) -> Value {
    json!({
        "success": true,
        "userData": user,
        "token": token,
        "message": message,
    })
}

pub fn failure_body(message: &str) -> Value {
    json!({ "success": false, "message": message })
}

/// A base URL nothing is listening on.
pub async fn unreachable_url(scheme: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind a free port");
    let port = listener
        .local_addr()
        .expect("Probe listener has no address")
        .port();
    drop(listener);
    format!("{scheme}://127.0.0.1:{port}")
}

/// Polls `check` until it returns true or the timeout elapses.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
