use crate::helpers::{
    ALICE_ID, TestBackend, TestSession, alice_json, auth_success_body, failure_body, mint_token,
};

use session_core::{MemoryTokenStore, Notice, Outcome, RecordingNotifier};

use models::{AuthMode, Credentials, ProfileUpdate};

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn logged_in(backend: &TestBackend, token: &str, notifier: &RecordingNotifier) -> TestSession {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_success_body(
            alice_json(),
            token,
            "Login successful",
        )))
        .mount(&backend.http)
        .await;

    let session = backend.session(&MemoryTokenStore::new(), notifier);
    session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await;
    notifier.take();
    session
}

/// **VALUE**: Verifies a profile update sends the session token and adopts
/// the server's copy of the profile.
///
/// **WHY THIS MATTERS**: The server is authoritative for the profile (it may
/// normalise fields or host the uploaded picture). The local copy must be
/// replaced with what it returns.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The `token` header is missing on authenticated calls
/// - Only the submitted fields are patched locally instead of replacing the profile
/// - Unset fields are sent as `null`
#[tokio::test]
async fn given_signed_in_user_when_profile_updated_then_server_profile_replaces_local() {
    // GIVEN: Alice signed in
    let backend = TestBackend::start().await;
    let token = mint_token(ALICE_ID);
    let notifier = RecordingNotifier::new();
    let session = logged_in(&backend, &token, &notifier).await;

    let mut updated = alice_json();
    updated["fullName"] = json!("Alice Cooper");
    updated["profilePic"] = json!("https://cdn.example.com/alice.png");
    Mock::given(method("PUT"))
        .and(path("/api/auth/update-profile"))
        .and(header("token", token.as_str()))
        .and(body_json(json!({ "fullName": "Alice Cooper" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "user": updated })),
        )
        .expect(1)
        .mount(&backend.http)
        .await;

    // WHEN: Changing the name
    let update = ProfileUpdate::builder()
        .with_full_name("Alice Cooper")
        .build()
        .expect("valid update");
    let outcome = session.update_profile(&update).await;

    // THEN: Server's profile adopted, success notice shown
    assert_eq!(outcome, Outcome::Success);
    let user = session.current_user().await.expect("still signed in");
    assert_eq!(user.full_name, "Alice Cooper");
    assert_eq!(
        user.profile_pic.as_deref(),
        Some("https://cdn.example.com/alice.png")
    );
    assert_eq!(
        notifier.notices(),
        vec![Notice::Success("Profile updated successfully".to_string())]
    );
}

#[tokio::test]
async fn given_server_refuses_update_when_profile_updated_then_profile_unchanged_and_error_notice() {
    // GIVEN: Alice signed in, server refusing updates
    let backend = TestBackend::start().await;
    let notifier = RecordingNotifier::new();
    let session = logged_in(&backend, &mint_token(ALICE_ID), &notifier).await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/update-profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(failure_body("Image upload failed")))
        .mount(&backend.http)
        .await;

    // WHEN: Updating the picture
    let update = ProfileUpdate::builder()
        .with_profile_pic("data:image/png;base64,AAAA")
        .build()
        .expect("valid update");
    let outcome = session.update_profile(&update).await;

    // THEN: Failure, local profile untouched
    assert_eq!(outcome, Outcome::failure("Image upload failed"));
    let user = session.current_user().await.expect("still signed in");
    assert_eq!(user.full_name, "Alice Smith");
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error("Image upload failed".to_string())]
    );
}

/// **VALUE**: Verifies an update without a session reaches the server without
/// a token and surfaces its refusal.
///
/// **WHY THIS MATTERS**: The server, not the client, decides that the request
/// is unauthorised. The user still gets told why nothing happened.
///
/// **BUG THIS CATCHES**: Would catch a stale token header being sent after logout.
#[tokio::test]
async fn given_signed_out_session_when_profile_updated_then_unauthorised_message_is_notified() {
    let backend = TestBackend::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/update-profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(failure_body("jwt must be provided")))
        .mount(&backend.http)
        .await;
    let notifier = RecordingNotifier::new();
    let session = backend.session(&MemoryTokenStore::new(), &notifier);

    let update = ProfileUpdate::builder()
        .with_bio("hello")
        .build()
        .expect("valid update");
    let outcome = session.update_profile(&update).await;

    assert_eq!(outcome, Outcome::failure("jwt must be provided"));
    assert!(session.current_user().await.is_none());
    let requests = backend
        .http
        .received_requests()
        .await
        .expect("request recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("token").is_none());
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error("jwt must be provided".to_string())]
    );
}
