use crate::helpers::{
    ALICE_ID, BOB_ID, TestBackend, alice_json, auth_success_body, bob_json, eventually,
    failure_body, mint_token, unreachable_url,
};

use session_core::{
    ClientConfig, ConnectOutcome, LinkStatus, MemoryTokenStore, Notice, Outcome,
    RecordingNotifier, SessionManager, TokenStore,
};

use models::{AuthMode, Credentials, UserId};

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_login(backend: &TestBackend, email: &str, user: serde_json::Value, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "email": email })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(auth_success_body(user, token, "Login successful")),
        )
        .mount(&backend.http)
        .await;
}

/// **VALUE**: Verifies the full happy path of logging in.
///
/// **WHY THIS MATTERS**: Login must populate token and profile together, persist
/// the token for the next start, open exactly one realtime connection tagged
/// with the user's id, and tell the user it worked.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The token is not persisted
/// - The realtime connection is missing the `userId` query
/// - More than one socket is opened per login
/// - The server's message is not forwarded as the success notice
#[tokio::test]
async fn given_valid_credentials_when_login_then_session_is_populated_and_one_socket_opens() {
    // GIVEN: A backend that accepts Alice's credentials
    let backend = TestBackend::start().await;
    let token = mint_token(ALICE_ID);
    mount_login(&backend, "alice@example.com", alice_json(), &token).await;

    let store = MemoryTokenStore::new();
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);

    // WHEN: Logging in
    let outcome = session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "hunter22"))
        .await;

    // THEN: Session populated, token persisted
    assert_eq!(outcome, Outcome::Success);
    assert!(session.is_authenticated().await);
    let user = session.current_user().await.expect("user set");
    assert_eq!(user.id, UserId::from(ALICE_ID));
    assert_eq!(user.full_name, "Alice Smith");
    let persisted = store.load().expect("store readable").expect("token saved");
    assert!(persisted.matches(&token));

    // THEN: Exactly one socket, tagged with Alice's id
    assert!(eventually(|| async { backend.socket.connection_count() == 1 }).await);
    assert_eq!(backend.socket.user_ids(), vec![Some(ALICE_ID.to_string())]);
    assert_eq!(
        session.realtime_status().await,
        LinkStatus::Connected(UserId::from(ALICE_ID))
    );

    // THEN: Success notice carries the server message
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success("Login successful".to_string())]
    );
}

#[tokio::test]
async fn given_signup_details_when_signup_then_full_name_and_bio_are_posted() {
    let backend = TestBackend::start().await;
    let token = mint_token(ALICE_ID);
    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_partial_json(json!({
            "email": "alice@example.com",
            "fullName": "Alice Smith",
            "bio": "hello",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "userData": alice_json(),
            "token": token,
        })))
        .expect(1)
        .mount(&backend.http)
        .await;

    let store = MemoryTokenStore::new();
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);

    let credentials =
        Credentials::sign_up("alice@example.com", "hunter22", "Alice Smith").with_bio("hello");
    let outcome = session.login(AuthMode::SignUp, &credentials).await;

    // No server message: the default sign-up text is used
    assert!(outcome.is_success());
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success("Account created successfully".to_string())]
    );
}

/// **VALUE**: Verifies that a refused login leaves no trace in the session.
///
/// **WHY THIS MATTERS**: The server reports bad credentials as `success: false`
/// with HTTP 200. Treating that as success would sign in a user with no token.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - `success: false` is ignored when the status is 2xx
/// - State or store is touched before the response is checked
/// - The server's message does not reach the error notice
#[tokio::test]
async fn given_wrong_password_when_login_then_state_unchanged_and_error_notice() {
    // GIVEN: A backend refusing the credentials
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(failure_body("Invalid credentials")))
        .mount(&backend.http)
        .await;

    let store = MemoryTokenStore::new();
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);

    // WHEN: Logging in
    let outcome = session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "wrong"))
        .await;

    // THEN: Failure, nothing stored, no socket, one error notice
    assert_eq!(outcome, Outcome::failure("Invalid credentials"));
    assert!(!session.is_authenticated().await);
    assert!(session.current_user().await.is_none());
    assert!(store.load().expect("store readable").is_none());
    assert_eq!(backend.socket.connection_count(), 0);
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error("Invalid credentials".to_string())]
    );
}

#[tokio::test]
async fn given_server_error_without_body_when_login_then_status_message_is_notified() {
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend.http)
        .await;

    let notifier = RecordingNotifier::new();
    let session = backend.session(&MemoryTokenStore::new(), &notifier);

    let outcome = session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await;

    assert_eq!(
        outcome,
        Outcome::failure("Request failed with status code 500")
    );
    assert!(notifier.notices().iter().all(Notice::is_error));
}

/// **VALUE**: Verifies logout clears everything and closes the socket.
///
/// **WHY THIS MATTERS**: After logout no trace of the user may remain: no
/// token on disk, no profile, no online list and no open connection that the
/// server still counts as that user being online.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The persisted token survives logout
/// - Presence from the old session lingers
/// - The socket is left open
#[tokio::test]
async fn given_logged_in_user_when_logout_then_session_store_and_socket_are_cleared() {
    // GIVEN: Alice logged in with someone online
    let backend = TestBackend::start().await;
    mount_login(&backend, "alice@example.com", alice_json(), &mint_token(ALICE_ID)).await;
    let store = MemoryTokenStore::new();
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);
    session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await;
    assert!(eventually(|| async { backend.socket.open_count() == 1 }).await);
    backend
        .socket
        .push_latest(&models::RealtimeFrame::online_users(&[UserId::from(BOB_ID)]));
    assert!(eventually(|| async { !session.online_users().await.is_empty() }).await);
    notifier.take();

    // WHEN: Logging out
    let outcome = session.logout().await;

    // THEN: Everything is gone
    assert_eq!(outcome, Outcome::Success);
    let snapshot = session.snapshot().await;
    assert!(!snapshot.is_authenticated());
    assert!(snapshot.user.is_none());
    assert!(!snapshot.has_token);
    assert!(snapshot.online.is_empty());
    assert!(store.load().expect("store readable").is_none());
    assert_eq!(session.realtime_status().await, LinkStatus::Disconnected);
    assert!(eventually(|| async { backend.socket.open_count() == 0 }).await);
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success("Logged out successfully".to_string())]
    );
}

#[tokio::test]
async fn given_signed_out_session_when_logout_then_it_still_succeeds() {
    let backend = TestBackend::start().await;
    let notifier = RecordingNotifier::new();
    let session = backend.session(&MemoryTokenStore::new(), &notifier);

    let outcome = session.logout().await;

    assert_eq!(outcome, Outcome::Success);
    assert_eq!(notifier.notices().len(), 1);
}

/// **VALUE**: Verifies that repeated connect requests never open a second socket.
///
/// **WHY THIS MATTERS**: Every extra socket makes the server count the user
/// online twice and doubles presence traffic.
///
/// **BUG THIS CATCHES**: Would catch a missing "already connected" check in
/// the link state machine.
#[tokio::test]
async fn given_open_link_when_connect_requested_again_then_no_second_socket() {
    // GIVEN: Alice logged in (one socket)
    let backend = TestBackend::start().await;
    mount_login(&backend, "alice@example.com", alice_json(), &mint_token(ALICE_ID)).await;
    let session = backend.session(&MemoryTokenStore::new(), &RecordingNotifier::new());
    session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await;
    let user = session.current_user().await.expect("user set");

    // WHEN: Connecting twice more
    let first = session.connect_realtime(Some(&user)).await.expect("connect");
    let second = session.connect_realtime(Some(&user)).await.expect("connect");

    // THEN: Both are no-ops
    assert_eq!(first, ConnectOutcome::AlreadyOpen);
    assert_eq!(second, ConnectOutcome::AlreadyOpen);
    assert!(eventually(|| async { backend.socket.connection_count() == 1 }).await);
    assert_eq!(backend.socket.open_count(), 1);
}

#[tokio::test]
async fn given_no_user_when_connect_requested_then_skipped() {
    let backend = TestBackend::start().await;
    let session = backend.session(&MemoryTokenStore::new(), &RecordingNotifier::new());

    let outcome = session.connect_realtime(None).await.expect("no error");

    assert_eq!(outcome, ConnectOutcome::Skipped);
    assert_eq!(backend.socket.connection_count(), 0);
}

/// **VALUE**: Verifies that switching accounts replaces the old socket.
///
/// **WHY THIS MATTERS**: A socket tagged with Alice's id must not stay open
/// once Bob is signed in, or the server would keep reporting Alice as online.
///
/// **BUG THIS CATCHES**: Would catch a connect that opens Bob's socket without
/// closing Alice's.
#[tokio::test]
async fn given_alice_connected_when_bob_logs_in_then_alice_socket_is_replaced() {
    // GIVEN: Alice logged in
    let backend = TestBackend::start().await;
    mount_login(&backend, "alice@example.com", alice_json(), &mint_token(ALICE_ID)).await;
    mount_login(&backend, "bob@example.com", bob_json(), &mint_token(BOB_ID)).await;
    let session = backend.session(&MemoryTokenStore::new(), &RecordingNotifier::new());
    session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await;

    // WHEN: Bob logs in on the same client
    let outcome = session
        .login(AuthMode::Login, &Credentials::login("bob@example.com", "pw"))
        .await;

    // THEN: Two sockets were opened in total, only Bob's is still open
    assert!(outcome.is_success());
    assert!(eventually(|| async { backend.socket.connection_count() == 2 }).await);
    assert!(eventually(|| async { backend.socket.open_count() == 1 }).await);
    assert_eq!(
        backend.socket.user_ids(),
        vec![Some(ALICE_ID.to_string()), Some(BOB_ID.to_string())]
    );
    assert_eq!(
        session.realtime_status().await,
        LinkStatus::Connected(UserId::from(BOB_ID))
    );
}

#[tokio::test]
async fn given_realtime_endpoint_down_when_login_then_login_still_succeeds() {
    // GIVEN: HTTP works, the realtime endpoint does not
    let backend = TestBackend::start().await;
    mount_login(&backend, "alice@example.com", alice_json(), &mint_token(ALICE_ID)).await;
    let mut config: ClientConfig = backend.config();
    config.realtime.url = Some(unreachable_url("ws").await);
    config.realtime.connect_max_elapsed_ms = 100;
    let notifier = RecordingNotifier::new();
    let session = SessionManager::new(&config, MemoryTokenStore::new(), notifier.clone())
        .expect("session");

    // WHEN: Logging in
    let outcome = session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await;

    // THEN: Signed in but offline
    assert!(outcome.is_success());
    assert!(session.is_authenticated().await);
    assert_eq!(session.realtime_status().await, LinkStatus::Disconnected);
    assert!(notifier.notices().iter().all(|n| !n.is_error()));
}

/// **VALUE**: Verifies the success notice is shown as soon as the user is
/// signed in, not after the realtime link settles.
///
/// **WHY THIS MATTERS**: Opening the link retries with backoff. Holding the
/// confirmation back for that long makes a working login look stuck.
///
/// **BUG THIS CATCHES**: Would catch the notice being emitted only after
/// `connect_realtime` returns.
#[tokio::test]
async fn given_slow_realtime_endpoint_when_login_then_success_notice_precedes_connect() {
    // GIVEN: A realtime endpoint that keeps refusing for up to two seconds
    let backend = TestBackend::start().await;
    mount_login(&backend, "alice@example.com", alice_json(), &mint_token(ALICE_ID)).await;
    let mut config = backend.config();
    config.realtime.url = Some(unreachable_url("ws").await);
    config.realtime.connect_max_elapsed_ms = 2_000;
    let notifier = RecordingNotifier::new();
    let session = SessionManager::new(&config, MemoryTokenStore::new(), notifier.clone())
        .expect("session");

    // WHEN: Logging in while watching for the notice
    let credentials = Credentials::login("alice@example.com", "pw");
    let (outcome, seen_while_connecting) = tokio::join!(
        session.login(AuthMode::Login, &credentials),
        eventually(|| async {
            !notifier.notices().is_empty()
                && session.realtime_status().await == LinkStatus::Connecting(UserId::from(ALICE_ID))
        })
    );

    // THEN: The notice was visible while the link was still being opened
    assert!(outcome.is_success());
    assert!(seen_while_connecting);
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success("Login successful".to_string())]
    );
}
