use crate::helpers::{
    ALICE_ID, BOB_ID, TestBackend, TestSession, alice_json, auth_success_body, eventually,
    mint_token,
};

use session_core::{ConnectOutcome, LinkStatus, MemoryTokenStore, RecordingNotifier};

use models::{AuthMode, Credentials, RealtimeFrame, UserId};

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const CAROL_ID: &str = "64f0c0ffee00000000000ca1";

async fn logged_in_alice(backend: &TestBackend) -> TestSession {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_success_body(
            alice_json(),
            &mint_token(ALICE_ID),
            "Login successful",
        )))
        .mount(&backend.http)
        .await;

    let session = backend.session(&MemoryTokenStore::new(), &RecordingNotifier::new());
    let outcome = session
        .login(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await;
    assert!(outcome.is_success());
    assert!(eventually(|| async { backend.socket.open_count() == 1 }).await);
    session
}

/// **VALUE**: Verifies presence pushes replace the online set.
///
/// **WHY THIS MATTERS**: The server always sends the complete list. Merging
/// would keep users online forever after they leave.
///
/// **BUG THIS CATCHES**: Would catch union/merge semantics in place of replacement.
#[tokio::test]
async fn given_two_pushes_when_received_then_only_latest_set_is_online() {
    // GIVEN: Alice connected
    let backend = TestBackend::start().await;
    let session = logged_in_alice(&backend).await;

    // WHEN: [Bob, Carol] is pushed, then [Carol]
    backend.socket.push_latest(&RealtimeFrame::online_users(&[
        UserId::from(BOB_ID),
        UserId::from(CAROL_ID),
    ]));
    assert!(eventually(|| async { session.online_users().await.len() == 2 }).await);
    backend
        .socket
        .push_latest(&RealtimeFrame::online_users(&[UserId::from(CAROL_ID)]));

    // THEN: Exactly {Carol}
    assert!(eventually(|| async { session.online_users().await.len() == 1 }).await);
    let online = session.online_users().await;
    assert!(online.is_online(&UserId::from(CAROL_ID)));
    assert!(!online.is_online(&UserId::from(BOB_ID)));
}

#[tokio::test]
async fn given_empty_push_when_received_then_nobody_is_online() {
    let backend = TestBackend::start().await;
    let session = logged_in_alice(&backend).await;
    backend
        .socket
        .push_latest(&RealtimeFrame::online_users(&[UserId::from(BOB_ID)]));
    assert!(eventually(|| async { !session.online_users().await.is_empty() }).await);

    backend.socket.push_latest(&RealtimeFrame::online_users(&[]));

    assert!(eventually(|| async { session.online_users().await.is_empty() }).await);
}

/// **VALUE**: Verifies garbage and unknown events do not kill the connection.
///
/// **WHY THIS MATTERS**: The server emits other events (messages, typing) on
/// the same socket. Dropping the link on the first unknown frame would leave
/// the user offline.
///
/// **BUG THIS CATCHES**: Would catch a decode error breaking the read loop.
#[tokio::test]
async fn given_unknown_and_malformed_frames_when_received_then_link_stays_up() {
    // GIVEN: Alice connected
    let backend = TestBackend::start().await;
    let session = logged_in_alice(&backend).await;

    // WHEN: Junk arrives, followed by a valid push
    backend.socket.push_raw_latest("not json at all");
    backend
        .socket
        .push_raw_latest(r#"{"event":"newMessage","data":{"text":"hi"}}"#);
    backend
        .socket
        .push_raw_latest(r#"{"event":"getOnlineUsers","data":"oops"}"#);
    backend
        .socket
        .push_latest(&RealtimeFrame::online_users(&[UserId::from(BOB_ID)]));

    // THEN: The valid push is applied and the link is still connected
    assert!(
        eventually(|| async { session.online_users().await.is_online(&UserId::from(BOB_ID)) })
            .await
    );
    assert_eq!(
        session.realtime_status().await,
        LinkStatus::Connected(UserId::from(ALICE_ID))
    );
}

/// **VALUE**: Verifies a socket closed by the server leaves a signed-in
/// session with a disconnected link and no presence.
///
/// **WHY THIS MATTERS**: The online list is only true while pushes can arrive.
/// A dead link showing yesterday's list misleads the user, and losing the
/// link must not sign them out.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The link keeps reporting `Connected` after the server hung up
/// - The last presence list survives the dead link
/// - The session is cleared along with the link
#[tokio::test]
async fn given_server_closes_socket_when_observed_then_link_is_disconnected_and_session_kept() {
    // GIVEN: Alice connected with Bob online
    let backend = TestBackend::start().await;
    let session = logged_in_alice(&backend).await;
    backend
        .socket
        .push_latest(&RealtimeFrame::online_users(&[UserId::from(BOB_ID)]));
    assert!(
        eventually(|| async { session.online_users().await.is_online(&UserId::from(BOB_ID)) })
            .await
    );

    // WHEN: The server closes the socket
    backend.socket.close_latest();

    // THEN: Link down, presence cleared, still signed in
    assert!(
        eventually(|| async { session.realtime_status().await == LinkStatus::Disconnected }).await
    );
    assert!(eventually(|| async { session.online_users().await.is_empty() }).await);
    assert!(session.is_authenticated().await);
}

/// **VALUE**: Verifies a dropped link can be reopened for the same user.
///
/// **WHY THIS MATTERS**: Without a way back the user stays invisible to
/// everyone until they restart the client.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Reconnect is refused as `AlreadyOpen` because stale link state remained
/// - The new socket is opened for the wrong user
/// - Pushes on the new socket are dropped by an outdated epoch or owner guard
#[tokio::test]
async fn given_server_closed_socket_when_reconnected_then_new_link_delivers_presence() {
    // GIVEN: Alice's link was closed by the server
    let backend = TestBackend::start().await;
    let session = logged_in_alice(&backend).await;
    backend.socket.close_latest();
    assert!(
        eventually(|| async { session.realtime_status().await == LinkStatus::Disconnected }).await
    );

    // WHEN: Reconnecting
    let outcome = session.reconnect_realtime().await.expect("reconnects");

    // THEN: A second socket for Alice that applies pushes
    assert_eq!(outcome, ConnectOutcome::Opened);
    assert!(eventually(|| async { backend.socket.open_count() == 1 }).await);
    assert_eq!(backend.socket.connection_count(), 2);
    assert_eq!(
        backend.socket.user_ids(),
        vec![Some(ALICE_ID.to_string()), Some(ALICE_ID.to_string())]
    );
    assert_eq!(
        session.realtime_status().await,
        LinkStatus::Connected(UserId::from(ALICE_ID))
    );

    backend
        .socket
        .push_latest(&RealtimeFrame::online_users(&[UserId::from(BOB_ID)]));
    assert!(
        eventually(|| async { session.online_users().await.is_online(&UserId::from(BOB_ID)) })
            .await
    );
}

#[tokio::test]
async fn given_open_link_when_reconnected_then_already_open_and_no_new_socket() {
    let backend = TestBackend::start().await;
    let session = logged_in_alice(&backend).await;

    let outcome = session.reconnect_realtime().await.expect("no error");

    assert_eq!(outcome, ConnectOutcome::AlreadyOpen);
    assert_eq!(backend.socket.connection_count(), 1);
}
