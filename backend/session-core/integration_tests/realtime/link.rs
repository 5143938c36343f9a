use crate::helpers::{ALICE_ID, BOB_ID, SocketServer, eventually, unreachable_url};

use session_core::error::RealtimeError;
use session_core::realtime::{PresenceSink, RealtimeLink};
use session_core::{ConnectOutcome, LinkStatus};

use models::{RealtimeFrame, UserId};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use url::Url;

/// Keeps every presence push it receives.
#[derive(Default)]
struct RecordingSink {
    pushes: Mutex<Vec<Vec<UserId>>>,
}

impl RecordingSink {
    fn pushes(&self) -> Vec<Vec<UserId>> {
        self.pushes.lock().expect("sink poisoned").clone()
    }
}

impl PresenceSink for RecordingSink {
    fn replace_online(&self, online: Vec<UserId>) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.pushes.lock().expect("sink poisoned").push(online);
        })
    }
}

fn link_to(server: &SocketServer) -> RealtimeLink {
    RealtimeLink::new(
        Url::parse(&server.url()).expect("valid url"),
        Duration::from_millis(500),
    )
}

/// **VALUE**: Verifies the link tags its socket with the user id and forwards pushes.
///
/// **WHY THIS MATTERS**: The server keys its online map by the `userId` query.
///
/// **BUG THIS CATCHES**: Would catch a missing query or a read loop that never
/// reaches the sink.
#[tokio::test]
async fn given_link_when_connected_then_user_id_is_sent_and_pushes_reach_sink() {
    // GIVEN: A socket server and a link to it
    let server = SocketServer::start().await;
    let link = link_to(&server);
    let sink = Arc::new(RecordingSink::default());

    // WHEN: Connecting as Alice and receiving a push
    let outcome = link
        .connect(&UserId::from(ALICE_ID), sink.clone())
        .await
        .expect("connects");
    assert!(eventually(|| async { server.connection_count() == 1 }).await);
    server.push_latest(&RealtimeFrame::online_users(&[UserId::from(BOB_ID)]));

    // THEN: Query carried the id, push delivered
    assert_eq!(outcome, ConnectOutcome::Opened);
    assert_eq!(server.user_ids(), vec![Some(ALICE_ID.to_string())]);
    assert_eq!(server.paths(), vec!["/socket".to_string()]);
    assert!(eventually(|| async { sink.pushes().len() == 1 }).await);
    assert_eq!(sink.pushes()[0], vec![UserId::from(BOB_ID)]);
}

#[tokio::test]
async fn given_open_link_when_disconnected_then_server_sees_close_and_status_resets() {
    let server = SocketServer::start().await;
    let link = link_to(&server);
    link.connect(&UserId::from(ALICE_ID), Arc::new(RecordingSink::default()))
        .await
        .expect("connects");
    assert!(eventually(|| async { server.open_count() == 1 }).await);

    let closed = link.disconnect().await;

    assert!(closed);
    assert_eq!(link.status().await, LinkStatus::Disconnected);
    assert!(eventually(|| async { server.open_count() == 0 }).await);
    // Second disconnect is a no-op
    assert!(!link.disconnect().await);
}

/// **VALUE**: Verifies a server-side close empties the sink exactly once.
///
/// **WHY THIS MATTERS**: The last list pushed over a dead socket is stale.
/// A local `disconnect` must not push anything, because the caller owns
/// the state at that point.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Presence survives a socket the server closed
/// - The shutdown path also clears presence and wipes a newer session's list
#[tokio::test]
async fn given_server_close_when_observed_then_sink_receives_empty_list() {
    // GIVEN: Alice connected with Bob pushed
    let server = SocketServer::start().await;
    let link = link_to(&server);
    let sink = Arc::new(RecordingSink::default());
    link.connect(&UserId::from(ALICE_ID), sink.clone())
        .await
        .expect("connects");
    assert!(eventually(|| async { server.open_count() == 1 }).await);
    server.push_latest(&RealtimeFrame::online_users(&[UserId::from(BOB_ID)]));
    assert!(eventually(|| async { sink.pushes().len() == 1 }).await);

    // WHEN: The server closes the socket
    server.close_latest();

    // THEN: An empty list follows, and the link is down
    assert!(eventually(|| async { link.status().await == LinkStatus::Disconnected }).await);
    assert_eq!(sink.pushes(), vec![vec![UserId::from(BOB_ID)], Vec::new()]);
}

#[tokio::test]
async fn given_local_disconnect_when_closed_then_sink_is_left_alone() {
    let server = SocketServer::start().await;
    let link = link_to(&server);
    let sink = Arc::new(RecordingSink::default());
    link.connect(&UserId::from(ALICE_ID), sink.clone())
        .await
        .expect("connects");
    assert!(eventually(|| async { server.open_count() == 1 }).await);

    link.disconnect().await;

    assert!(sink.pushes().is_empty());
}

#[tokio::test]
async fn given_nothing_listening_when_connecting_then_error_after_retry_budget() {
    let endpoint = Url::parse(&format!("{}/socket", unreachable_url("ws").await)).expect("url");
    let link = RealtimeLink::new(endpoint, Duration::from_millis(100));

    let result = link
        .connect(&UserId::from(ALICE_ID), Arc::new(RecordingSink::default()))
        .await;

    assert!(matches!(result, Err(RealtimeError::Connect { .. })));
    assert_eq!(link.status().await, LinkStatus::Disconnected);
}
