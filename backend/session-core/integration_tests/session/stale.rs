//! Responses that arrive after a logout must not bring the old session back.

use crate::helpers::{ALICE_ID, TestBackend, alice_json, auth_success_body, mint_token};

use session_core::{LinkStatus, MemoryTokenStore, Notice, Outcome, RecordingNotifier, TokenStore};

use models::{AuthMode, Credentials, ProfileUpdate};

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const SERVER_DELAY: Duration = Duration::from_millis(300);
const LOGOUT_AFTER: Duration = Duration::from_millis(100);
const SESSION_CHANGED: &str = "Session changed before the request completed";

/// **VALUE**: Verifies a login answered after the user logged out is discarded.
///
/// **WHY THIS MATTERS**: The user asked to be signed out. A slow server reply
/// must not sign them back in, persist a token, or open a socket behind their
/// back.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The late grant is applied without checking the session epoch
/// - The token is persisted after the logout cleared the store
/// - A realtime link is opened for the discarded user
/// - A success notice is shown for a login that did not stick
#[tokio::test]
async fn given_login_in_flight_when_logout_runs_first_then_late_grant_is_discarded() {
    // GIVEN: A server that takes 300ms to accept Alice's login
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_success_body(
                    alice_json(),
                    &mint_token(ALICE_ID),
                    "Login successful",
                ))
                .set_delay(SERVER_DELAY),
        )
        .expect(1)
        .mount(&backend.http)
        .await;
    let store = MemoryTokenStore::new();
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);

    // WHEN: Logging out 100ms into the login
    let credentials = Credentials::login("alice@example.com", "pw");
    let (login, logout) = tokio::join!(
        session.login(AuthMode::Login, &credentials),
        async {
            tokio::time::sleep(LOGOUT_AFTER).await;
            session.logout().await
        }
    );

    // THEN: The login reports the session change and left nothing behind
    assert_eq!(logout, Outcome::Success);
    assert_eq!(login, Outcome::failure(SESSION_CHANGED));
    assert!(!session.is_authenticated().await);
    assert!(session.current_user().await.is_none());
    assert!(store.load().expect("store readable").is_none());
    assert_eq!(session.realtime_status().await, LinkStatus::Disconnected);
    assert_eq!(backend.socket.connection_count(), 0);
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success("Logged out successfully".to_string())]
    );
}

/// **VALUE**: Verifies a profile update answered after logout does not
/// restore the profile.
///
/// **WHY THIS MATTERS**: A signed-out client showing a user's profile again
/// looks like the logout failed.
///
/// **BUG THIS CATCHES**: Would catch `SetUser` being applied without its epoch
/// guard, leaving a profile with no token.
#[tokio::test]
async fn given_profile_update_in_flight_when_logout_runs_first_then_late_profile_is_discarded() {
    // GIVEN: Alice signed in, and a server that takes 300ms to save her profile
    let backend = TestBackend::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_success_body(
            alice_json(),
            &mint_token(ALICE_ID),
            "Login successful",
        )))
        .mount(&backend.http)
        .await;
    let mut updated = alice_json();
    updated["fullName"] = json!("Alice Cooper");
    Mock::given(method("PUT"))
        .and(path("/api/auth/update-profile"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "user": updated }))
                .set_delay(SERVER_DELAY),
        )
        .expect(1)
        .mount(&backend.http)
        .await;

    let store = MemoryTokenStore::new();
    let notifier = RecordingNotifier::new();
    let session = backend.session(&store, &notifier);
    assert!(
        session
            .login(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
            .await
            .is_success()
    );
    notifier.take();

    let update = ProfileUpdate::builder()
        .with_full_name("Alice Cooper")
        .build()
        .expect("valid update");

    // WHEN: Logging out 100ms into the update
    let (result, _) = tokio::join!(session.update_profile(&update), async {
        tokio::time::sleep(LOGOUT_AFTER).await;
        session.logout().await
    });

    // THEN: The update reports the session change and the session stays empty
    assert_eq!(result, Outcome::failure(SESSION_CHANGED));
    assert!(session.current_user().await.is_none());
    assert!(!session.is_authenticated().await);
    assert!(store.load().expect("store readable").is_none());
    assert_eq!(session.realtime_status().await, LinkStatus::Disconnected);
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success("Logged out successfully".to_string())]
    );
}
