// Unit tests for the session state actor

use crate::session::state::{SessionState, StateCommand};

use common::RedactedToken;
use models::{UserId, UserProfile};

fn profile(id: &str) -> UserProfile {
    UserProfile {
        id: UserId::from(id),
        email: format!("{id}@example.com"),
        full_name: format!("User {id}"),
        profile_pic: None,
        bio: None,
    }
}

async fn signed_in(id: &str) -> SessionState {
    let state = SessionState::new();
    let applied = state
        .apply(StateCommand::SignIn {
            epoch: 0,
            token: RedactedToken::new("tok"),
            user: profile(id),
        })
        .await
        .expect("actor alive");
    assert!(applied);
    state
}

/// **VALUE**: Verifies token and profile are set together.
///
/// **WHY THIS MATTERS**: The session must never be half-authenticated.
///
/// **BUG THIS CATCHES**: Would catch SignIn writing only one of the two fields.
#[tokio::test]
async fn given_sign_in_when_applied_then_token_and_user_are_present() {
    // GIVEN/WHEN: A fresh state after SignIn
    let state = signed_in("u1").await;

    // THEN: Both present
    let snapshot = state.snapshot().await;
    assert!(snapshot.is_authenticated());
    assert_eq!(snapshot.user.map(|u| u.id), Some(UserId::from("u1")));
    assert!(state.token().await.is_some_and(|t| t.matches("tok")));
}

/// **VALUE**: Verifies presence pushes replace, in order.
///
/// **WHY THIS MATTERS**: `[A, B]` then `[B]` must leave exactly `{B}`.
///
/// **BUG THIS CATCHES**: Would catch merge semantics or out-of-order application
/// between `post` (fire-and-forget) and `apply`.
#[tokio::test]
async fn given_two_presence_pushes_when_applied_then_last_one_wins() {
    // GIVEN: A signed-in session
    let state = signed_in("u1").await;

    // WHEN: Two pushes are posted, then a barrier command is applied
    state
        .post(StateCommand::ReplacePresence {
            epoch: 0,
            owner: UserId::from("u1"),
            online: vec![UserId::from("A"), UserId::from("B")],
        })
        .await
        .expect("posted");
    state
        .post(StateCommand::ReplacePresence {
            epoch: 0,
            owner: UserId::from("u1"),
            online: vec![UserId::from("B")],
        })
        .await
        .expect("posted");
    state
        .apply(StateCommand::SetUser {
            epoch: 0,
            user: profile("u1"),
        })
        .await
        .expect("actor alive");

    // THEN: Exactly {B}
    let online = state.online_users().await;
    assert_eq!(online.len(), 1);
    assert!(online.is_online(&UserId::from("B")));
}

/// **VALUE**: Verifies that commands from before a Clear are dropped.
///
/// **WHY THIS MATTERS**: A login or profile response that arrives after the
/// user logged out must not resurrect the session.
///
/// **BUG THIS CATCHES**: Would catch Clear not bumping the epoch, or the epoch
/// check being skipped for one of the command kinds.
#[tokio::test]
async fn given_cleared_session_when_stale_commands_arrive_then_they_are_dropped() {
    // GIVEN: A session that was signed in (epoch 0) and then cleared
    let state = signed_in("u1").await;
    state.apply(StateCommand::Clear).await.expect("actor alive");
    assert_eq!(state.epoch().await, 1);

    // WHEN: Epoch-0 commands arrive late
    let sign_in = state
        .apply(StateCommand::SignIn {
            epoch: 0,
            token: RedactedToken::new("late"),
            user: profile("u1"),
        })
        .await
        .expect("actor alive");
    let set_user = state
        .apply(StateCommand::SetUser {
            epoch: 0,
            user: profile("u1"),
        })
        .await
        .expect("actor alive");
    let presence = state
        .apply(StateCommand::ReplacePresence {
            epoch: 0,
            owner: UserId::from("u1"),
            online: vec![UserId::from("A")],
        })
        .await
        .expect("actor alive");

    // THEN: None applied, session still empty
    assert!(!sign_in && !set_user && !presence);
    let snapshot = state.snapshot().await;
    assert!(!snapshot.is_authenticated());
    assert!(!snapshot.has_token);
    assert!(snapshot.online.is_empty());
}

#[tokio::test]
async fn given_presence_from_other_users_connection_when_applied_then_dropped() {
    let state = signed_in("u1").await;

    let applied = state
        .apply(StateCommand::ReplacePresence {
            epoch: 0,
            owner: UserId::from("someone-else"),
            online: vec![UserId::from("A")],
        })
        .await
        .expect("actor alive");

    assert!(!applied);
    assert!(state.online_users().await.is_empty());
}

#[tokio::test]
async fn given_no_user_when_profile_set_then_dropped() {
    let state = SessionState::new();

    let applied = state
        .apply(StateCommand::SetUser {
            epoch: 0,
            user: profile("u1"),
        })
        .await
        .expect("actor alive");

    assert!(!applied);
    assert!(state.current_user().await.is_none());
}

#[tokio::test]
async fn given_online_users_when_cleared_then_presence_and_profile_are_gone() {
    let state = signed_in("u1").await;
    state
        .apply(StateCommand::ReplacePresence {
            epoch: 0,
            owner: UserId::from("u1"),
            online: vec![UserId::from("A")],
        })
        .await
        .expect("actor alive");

    state.apply(StateCommand::Clear).await.expect("actor alive");

    let snapshot = state.snapshot().await;
    assert!(snapshot.user.is_none());
    assert!(snapshot.online.is_empty());
}
