use crate::RedactedToken;

/// **VALUE**: Verifies the token never appears in Debug or Display output.
///
/// **WHY THIS MATTERS**: Session state and errors are logged liberally. A token
/// leaking into a log file is a credential leak.
///
/// **BUG THIS CATCHES**: Would catch someone replacing the manual Debug impl
/// with `#[derive(Debug)]`.
#[test]
fn given_token_when_formatted_then_value_is_hidden() {
    // GIVEN: A token with a recognizable value
    let token = RedactedToken::new("eyJhbGciOiJIUzI1NiJ9.secret-payload");

    // WHEN: Formatting with Debug and Display
    let debug = format!("{token:?}");
    let display = format!("{token}");

    // THEN: Neither contains the raw value
    assert!(!debug.contains("secret-payload"));
    assert!(!display.contains("secret-payload"));
    assert!(debug.contains("REDACTED"));
}

/// **VALUE**: Verifies serde serialization is refused.
///
/// **WHY THIS MATTERS**: A token embedded in a serialized snapshot or error
/// would be written out in clear text.
///
/// **BUG THIS CATCHES**: Would catch a derived `Serialize`.
#[test]
fn given_token_when_serialized_then_fails() {
    let token = RedactedToken::new("abc");

    let result = serde_json::to_string(&token);

    assert!(result.is_err(), "RedactedToken must refuse serialization");
}

#[test]
fn given_token_when_accessed_explicitly_then_returns_raw_value() {
    let token = RedactedToken::new("abc");

    assert_eq!(token.as_str(), "abc");
    assert_eq!(token.len(), 3);
    assert!(!token.is_empty());
    assert!(token.matches("abc"));
    assert!(!token.matches("abd"));
}
