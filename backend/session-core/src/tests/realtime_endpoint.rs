use crate::realtime::realtime_endpoint;

use url::Url;

#[test]
fn given_http_base_when_endpoint_built_then_uses_ws_scheme() {
    let base = Url::parse("http://127.0.0.1:5000/").expect("valid url");

    let endpoint = realtime_endpoint(&base, "/socket").expect("endpoint");

    assert_eq!(endpoint.as_str(), "ws://127.0.0.1:5000/socket");
}

#[test]
fn given_https_base_with_prefix_when_endpoint_built_then_keeps_prefix_and_uses_wss() {
    let base = Url::parse("https://chat.example.com/app/").expect("valid url");

    let endpoint = realtime_endpoint(&base, "/socket").expect("endpoint");

    assert_eq!(endpoint.as_str(), "wss://chat.example.com/app/socket");
}

/// **VALUE**: Verifies that unknown schemes are refused instead of guessed.
///
/// **WHY THIS MATTERS**: Silently opening a plain-text socket for a backend the
/// user configured differently would be a surprising downgrade.
///
/// **BUG THIS CATCHES**: Would catch a catch-all arm mapping everything to `ws`.
#[test]
fn given_unsupported_scheme_when_endpoint_built_then_returns_error() {
    let base = Url::parse("ftp://files.example.com/").expect("valid url");

    assert!(realtime_endpoint(&base, "/socket").is_err());
}
