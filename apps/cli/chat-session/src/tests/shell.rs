// Unit tests for the prompt loop that need no backend

use crate::commands::Command;
use crate::shell::{Flow, HELP_TEXT, PROMPT, describe_restore, execute, run};

use models::{UserId, UserProfile};
use session_core::{
    ClientConfig, MemoryTokenStore, RecordingNotifier, RestoreOutcome, SessionManager,
};

fn offline_session() -> SessionManager<MemoryTokenStore, RecordingNotifier> {
    SessionManager::new(
        &ClientConfig::default(),
        MemoryTokenStore::new(),
        RecordingNotifier::new(),
    )
    .expect("default config is valid")
}

fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("utf-8 output")
}

#[tokio::test]
async fn given_signed_out_session_when_whoami_then_says_not_signed_in() {
    let session = offline_session();
    let mut out = Vec::new();

    let flow = execute(&session, Command::WhoAmI, &mut out)
        .await
        .expect("runs");

    assert_eq!(flow, Flow::Continue);
    assert_eq!(output(out), "Not signed in.\n");
}

#[tokio::test]
async fn given_signed_out_session_when_status_then_reports_signed_out_and_disconnected() {
    let session = offline_session();
    let mut out = Vec::new();

    execute(&session, Command::Status, &mut out)
        .await
        .expect("runs");

    assert_eq!(output(out), "Session: signed out; realtime: disconnected\n");
}

#[tokio::test]
async fn given_nobody_online_when_online_then_says_so() {
    let session = offline_session();
    let mut out = Vec::new();

    execute(&session, Command::Online, &mut out)
        .await
        .expect("runs");

    assert_eq!(output(out), "Nobody else is online.\n");
}

/// **VALUE**: Verifies invalid profile input is refused before any request.
///
/// **WHY THIS MATTERS**: A blank name would otherwise reach the server and
/// come back as a confusing server-side error. The prompt must also survive
/// the mistake.
///
/// **BUG THIS CATCHES**: Would catch the builder's validation being bypassed,
/// or its error being propagated with `?` and ending the program.
#[tokio::test]
async fn given_blank_name_when_executed_then_message_printed_and_loop_continues() {
    // GIVEN: A signed-out session that records notices
    let notifier = RecordingNotifier::new();
    let session = SessionManager::new(
        &ClientConfig::default(),
        MemoryTokenStore::new(),
        notifier.clone(),
    )
    .expect("default config is valid");
    let mut out = Vec::new();

    // WHEN: Setting a blank name
    let flow = execute(&session, Command::SetName("   ".to_string()), &mut out)
        .await
        .expect("validation errors are not fatal");

    // THEN: The reason is printed, nothing was sent, and the loop goes on
    assert_eq!(flow, Flow::Continue);
    assert_eq!(output(out), "Full name cannot be empty\n");
    assert!(notifier.notices().is_empty());
}

/// **VALUE**: Verifies `reconnect` without a signed-in user does nothing.
///
/// **BUG THIS CATCHES**: Would catch a reconnect opening a socket with no
/// user behind it.
#[tokio::test]
async fn given_signed_out_session_when_reconnect_then_says_not_signed_in() {
    let session = offline_session();
    let mut out = Vec::new();

    let flow = execute(&session, Command::Reconnect, &mut out)
        .await
        .expect("runs");

    assert_eq!(flow, Flow::Continue);
    assert_eq!(output(out), "Not signed in.\n");
    assert_eq!(
        session.realtime_status().await,
        session_core::LinkStatus::Disconnected
    );
}

/// **VALUE**: Verifies the loop keeps going after bad input and stops on quit.
///
/// **WHY THIS MATTERS**: A typo must not end the session.
///
/// **BUG THIS CATCHES**: Would catch parse errors being propagated with `?`.
#[tokio::test]
async fn given_typo_then_help_then_quit_when_run_then_all_are_handled_in_order() {
    // GIVEN: Three lines of input, and a fourth that must never run
    let session = offline_session();
    let input: &[u8] = b"dance\nhelp\nquit\nwhoami\n";
    let mut out = Vec::new();

    // WHEN: Running the loop
    run(&session, input, &mut out).await.expect("runs");

    // THEN: Error, help, then stop
    let text = output(out);
    assert!(text.contains("Unknown command 'dance'"));
    assert!(text.contains(HELP_TEXT));
    assert!(!text.contains("Not signed in."));
    assert_eq!(text.matches(PROMPT).count(), 3);
}

#[tokio::test]
async fn given_end_of_input_when_run_then_returns_ok() {
    let session = offline_session();
    let input: &[u8] = b"status\n";
    let mut out = Vec::new();

    run(&session, input, &mut out).await.expect("runs");

    assert!(output(out).contains("realtime: disconnected"));
}

#[test]
fn given_restore_outcomes_when_described_then_greeting_matches() {
    let user = UserProfile {
        id: UserId::from("u1"),
        email: "alice@example.com".to_string(),
        full_name: "Alice Smith".to_string(),
        profile_pic: None,
        bio: None,
    };

    assert_eq!(
        describe_restore(&RestoreOutcome::Restored(user)),
        "Welcome back, Alice Smith."
    );
    assert!(describe_restore(&RestoreOutcome::Rejected).starts_with("Not signed in"));
    assert!(describe_restore(&RestoreOutcome::Unreachable).contains("next time"));
}
