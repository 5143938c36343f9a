use crate::{AuthMode, Credentials};

use serde_json::json;

#[test]
fn given_auth_modes_when_path_segment_then_matches_endpoints() {
    assert_eq!(AuthMode::SignUp.path_segment(), "signup");
    assert_eq!(AuthMode::Login.path_segment(), "login");
    assert_eq!(AuthMode::Login.to_string(), "login");
}

/// **VALUE**: Verifies the password never shows up in Debug output.
///
/// **WHY THIS MATTERS**: Credentials pass through code paths that log at debug
/// level; a derived Debug would write passwords into the log file.
///
/// **BUG THIS CATCHES**: Would catch replacing the manual impl with a derive.
#[test]
fn given_credentials_when_debug_formatted_then_password_is_redacted() {
    let credentials = Credentials::login("ada@example.com", "hunter2");

    let debug = format!("{credentials:?}");

    assert!(debug.contains("ada@example.com"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn given_login_credentials_when_serialized_then_signup_fields_are_omitted() {
    let credentials = Credentials::login("ada@example.com", "hunter2");

    let json = serde_json::to_value(&credentials).expect("serializable");

    assert_eq!(
        json,
        json!({ "email": "ada@example.com", "password": "hunter2" })
    );
}

#[test]
fn given_signup_credentials_when_serialized_then_server_field_names_are_used() {
    let credentials =
        Credentials::sign_up("ada@example.com", "hunter2", "Ada Lovelace").with_bio("hello");

    let json = serde_json::to_value(&credentials).expect("serializable");

    assert_eq!(json["fullName"], "Ada Lovelace");
    assert_eq!(json["bio"], "hello");
}
