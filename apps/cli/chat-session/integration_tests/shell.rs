use chat_session::shell::run;

use session_core::{ClientConfig, MemoryTokenStore, Notice, RecordingNotifier, SessionManager, TokenStore};

use serde_json::json;
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests for the prompt loop against a mocked backend
// ============================================================================

async fn closed_socket_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind a free port");
    let port = listener.local_addr().expect("no address").port();
    drop(listener);
    format!("ws://127.0.0.1:{port}/socket")
}

/// **VALUE**: Drives a whole terminal session: log in, look, log out.
///
/// **WHY THIS MATTERS**: This is the path a user takes on every run. It checks
/// that typed commands reach the session and that reads reflect its state.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - `login` arguments are not forwarded to the auth endpoint
/// - `whoami` reads a stale profile
/// - `logout` leaves the token in the store
#[tokio::test]
async fn given_scripted_input_when_run_then_login_whoami_logout_behave() {
    // GIVEN: A backend accepting Alice, with no realtime endpoint
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "email": "alice@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "userData": {
                "_id": "64f0c0ffee0000000000a11c",
                "email": "alice@example.com",
                "fullName": "Alice Smith",
                "bio": "Rust and tea",
            },
            "token": "header.payload.signature",
            "message": "Login successful",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = ClientConfig::default();
    config.server.base_url = server.uri();
    config.realtime.url = Some(closed_socket_url().await);
    config.realtime.connect_max_elapsed_ms = 100;

    let store = MemoryTokenStore::new();
    let notifier = RecordingNotifier::new();
    let session =
        SessionManager::new(&config, store.clone(), notifier.clone()).expect("session");

    // WHEN: Running a scripted session
    let input: &[u8] = b"login alice@example.com hunter22\nwhoami\nlogout\nstatus\nquit\n";
    let mut out = Vec::new();
    run(&session, input, &mut out).await.expect("runs");

    // THEN: Profile was shown while signed in, and the session ended signed out
    let text = String::from_utf8(out).expect("utf-8");
    assert!(text.contains("Alice Smith <alice@example.com> (64f0c0ffee0000000000a11c)"));
    assert!(text.contains("Bio: Rust and tea"));
    assert!(text.contains("Session: signed out; realtime: disconnected"));
    assert!(store.load().expect("store readable").is_none());
    assert_eq!(
        notifier.notices(),
        vec![
            Notice::Success("Login successful".to_string()),
            Notice::Success("Logged out successfully".to_string()),
        ]
    );
}
