// Unit tests for prompt command parsing

use crate::commands::{Command, parse};
use crate::error::AppError;

#[test]
fn given_blank_line_when_parsed_then_nothing_to_do() {
    assert_eq!(parse("   ").expect("blank is fine"), None);
}

#[test]
fn given_login_line_when_parsed_then_email_and_password_extracted() {
    let command = parse("login alice@example.com hunter22").expect("valid");

    assert_eq!(
        command,
        Some(Command::Login {
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
        })
    );
}

/// **VALUE**: Verifies multi-word names and the optional bio survive parsing.
///
/// **WHY THIS MATTERS**: Full names contain spaces. Splitting on every space
/// would send only the first name to the server.
///
/// **BUG THIS CATCHES**: Would catch `split_whitespace` being used for the
/// trailing full-name argument.
#[test]
fn given_signup_with_bio_when_parsed_then_full_name_and_bio_are_kept_whole() {
    // GIVEN/WHEN: A sign-up line with a two-word name and a bio
    let command = parse("signup alice@example.com hunter22 Alice  Smith | Rust and tea").expect("valid");

    // THEN: Name keeps its words, bio is split off
    assert_eq!(
        command,
        Some(Command::SignUp {
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
            full_name: "Alice  Smith".to_string(),
            bio: Some("Rust and tea".to_string()),
        })
    );
}

#[test]
fn given_signup_without_bio_when_parsed_then_bio_is_none() {
    let command = parse("SIGNUP bob@example.com pw Bob").expect("valid");

    assert!(matches!(command, Some(Command::SignUp { bio: None, .. })));
}

#[test]
fn given_signup_missing_name_when_parsed_then_usage_error() {
    let error = parse("signup bob@example.com pw").expect_err("name missing");

    assert!(matches!(error, AppError::Command { .. }));
    assert!(error.user_message().starts_with("Usage: signup"));
}

#[test]
fn given_login_with_extra_words_when_parsed_then_usage_error() {
    assert!(parse("login a@example.com pw extra").is_err());
    assert!(parse("login a@example.com").is_err());
}

#[test]
fn given_profile_commands_when_parsed_then_rest_of_line_is_the_value() {
    assert_eq!(
        parse("name Alice Cooper").expect("valid"),
        Some(Command::SetName("Alice Cooper".to_string()))
    );
    assert_eq!(
        parse("bio  likes long walks ").expect("valid"),
        Some(Command::SetBio("likes long walks".to_string()))
    );
    assert_eq!(
        parse("avatar https://cdn.example.com/a.png").expect("valid"),
        Some(Command::SetAvatar("https://cdn.example.com/a.png".to_string()))
    );
    assert!(parse("name").is_err());
}

#[test]
fn given_unknown_verb_when_parsed_then_error_mentions_help() {
    let error = parse("dance").expect_err("unknown");

    assert!(error.user_message().contains("'dance'"));
    assert!(error.user_message().contains("help"));
}

#[test]
fn given_aliases_when_parsed_then_map_to_same_command() {
    assert_eq!(parse("exit").expect("valid"), Some(Command::Quit));
    assert_eq!(parse("quit").expect("valid"), Some(Command::Quit));
    assert_eq!(parse("me").expect("valid"), Some(Command::WhoAmI));
    assert_eq!(parse("?").expect("valid"), Some(Command::Help));
}

#[test]
fn given_reconnect_when_parsed_then_reconnect_command() {
    assert_eq!(parse("reconnect").expect("valid"), Some(Command::Reconnect));
    assert_eq!(parse("  RECONNECT ").expect("valid"), Some(Command::Reconnect));
}
