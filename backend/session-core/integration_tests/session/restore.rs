use crate::helpers::{ALICE_ID, TestBackend, alice_json, eventually, failure_body, mint_token, unreachable_url};

use session_core::{
    LinkStatus, MemoryTokenStore, RecordingNotifier, RestoreOutcome, SessionManager, TokenStore,
};

use models::UserId;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

/// **VALUE**: Verifies a valid persisted token resumes the session on start.
///
/// **WHY THIS MATTERS**: This is what keeps users signed in across restarts.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The token is not sent in the `token` header
/// - The restored session does not open its realtime link
/// - Restore emits a notice (it must be silent)
#[tokio::test]
async fn given_valid_persisted_token_when_restored_then_session_resumes_and_connects() {
    // GIVEN: A persisted token the server accepts
    let backend = TestBackend::start().await;
    let token = mint_token(ALICE_ID);
    Mock::given(method("GET"))
        .and(path("/api/auth/check"))
        .and(header("token", token.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "user": alice_json() })),
        )
        .expect(1)
        .mount(&backend.http)
        .await;
    let store = MemoryTokenStore::with_token(token.clone());
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);

    // WHEN: Restoring
    let outcome = session.restore().await;

    // THEN: Signed in, connected, silent
    assert!(outcome.is_restored());
    assert!(session.is_authenticated().await);
    assert!(eventually(|| async { backend.socket.connection_count() == 1 }).await);
    assert_eq!(backend.socket.user_ids(), vec![Some(ALICE_ID.to_string())]);
    assert_eq!(
        session.realtime_status().await,
        LinkStatus::Connected(UserId::from(ALICE_ID))
    );
    assert!(notifier.notices().is_empty());
}

/// **VALUE**: Verifies a refused token leaves a clean, signed-out session.
///
/// **WHY THIS MATTERS**: An expired or revoked token must not be retried on
/// every start, and the user must not be greeted with an error for it.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The refused token stays in the store
/// - Partial state (profile without token) is left behind
/// - An error notice is shown during start-up
#[tokio::test]
async fn given_invalid_persisted_token_when_restored_then_empty_session_and_store_cleared() {
    // GIVEN: A persisted token the server refuses
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(failure_body("invalid signature")))
        .mount(&backend.http)
        .await;
    let store = MemoryTokenStore::with_token("forged.token.value");
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);

    // WHEN: Restoring
    let outcome = session.restore().await;

    // THEN: Nothing restored, nothing shown, token gone
    assert_eq!(outcome, RestoreOutcome::Rejected);
    let snapshot = session.snapshot().await;
    assert!(snapshot.user.is_none());
    assert!(!snapshot.has_token);
    assert!(store.load().expect("store readable").is_none());
    assert!(notifier.notices().is_empty());
    assert_eq!(backend.socket.connection_count(), 0);
}

#[tokio::test]
async fn given_no_persisted_token_when_restored_then_server_is_not_contacted() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend.http)
        .await;
    let session = backend.session(&MemoryTokenStore::new(), &RecordingNotifier::new());

    let outcome = session.restore().await;

    assert_eq!(outcome, RestoreOutcome::NoToken);
    assert!(!session.is_authenticated().await);
}

/// **VALUE**: Verifies an unreachable server does not cost the user their token.
///
/// **WHY THIS MATTERS**: Starting the client offline must not sign the user out
/// for good; the token is still valid as far as anyone knows.
///
/// **BUG THIS CATCHES**: Would catch transport failures being treated like a
/// server refusal.
#[tokio::test]
async fn given_unreachable_server_when_restored_then_token_is_kept() {
    // GIVEN: Nothing listening at the backend URL
    let backend = TestBackend::start().await;
    let mut config = backend.config();
    config.server.base_url = unreachable_url("http").await;
    let token = mint_token(ALICE_ID);
    let store = MemoryTokenStore::with_token(token.clone());
    let notifier = RecordingNotifier::new();
    let session =
        SessionManager::new(&config, store.clone(), notifier.clone()).expect("session");

    // WHEN: Restoring
    let outcome = session.restore().await;

    // THEN: Signed out for now, token kept, nothing shown
    assert_eq!(outcome, RestoreOutcome::Unreachable);
    assert!(!session.is_authenticated().await);
    assert!(
        store
            .load()
            .expect("store readable")
            .is_some_and(|t| t.matches(&token))
    );
    assert!(notifier.notices().is_empty());
}

/// **VALUE**: Verifies a server outage during restore keeps the token.
///
/// **WHY THIS MATTERS**: A 503 says the server is down, not that the token is
/// bad. Deleting it would sign the user out for good because of a deploy.
///
/// **BUG THIS CATCHES**: Would catch any non-2xx reply being treated as a
/// refusal of the credential.
#[tokio::test]
async fn given_service_unavailable_when_restored_then_unreachable_and_token_kept() {
    // GIVEN: A persisted token and a server answering 503
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "Service Unavailable" })),
        )
        .expect(1)
        .mount(&backend.http)
        .await;
    let token = mint_token(ALICE_ID);
    let store = MemoryTokenStore::with_token(token.clone());
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);

    // WHEN: Restoring
    let outcome = session.restore().await;

    // THEN: Treated as unreachable, token still there, nothing shown
    assert_eq!(outcome, RestoreOutcome::Unreachable);
    assert!(!session.is_authenticated().await);
    assert!(
        store
            .load()
            .expect("store readable")
            .is_some_and(|t| t.matches(&token))
    );
    assert!(notifier.notices().is_empty());
    assert_eq!(backend.socket.connection_count(), 0);
}

/// **VALUE**: Verifies a 401 during restore counts as a refusal.
///
/// **BUG THIS CATCHES**: Would catch the outage rule being widened to every
/// HTTP error, leaving a revoked token to be retried forever.
#[tokio::test]
async fn given_unauthorized_status_when_restored_then_rejected_and_store_cleared() {
    let backend = TestBackend::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/check"))
        .respond_with(ResponseTemplate::new(401).set_body_json(failure_body("jwt expired")))
        .mount(&backend.http)
        .await;
    let store = MemoryTokenStore::with_token(mint_token(ALICE_ID));
    let session = backend.session(&store, &RecordingNotifier::new());

    let outcome = session.restore().await;

    assert_eq!(outcome, RestoreOutcome::Rejected);
    assert!(store.load().expect("store readable").is_none());
}
