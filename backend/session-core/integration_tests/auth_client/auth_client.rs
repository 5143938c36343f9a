use crate::helpers::{ALICE_ID, alice_json, auth_success_body, failure_body, mint_token, unreachable_url};

use session_core::AuthClient;
use session_core::error::ApiError;

use common::{HttpStatusCode, RedactedToken};
use models::{AuthMode, Credentials, UserId};

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Public API tests for AuthClient
// ============================================================================

/// **VALUE**: Verifies the check call sends the token header and parses the user.
///
/// **WHY THIS MATTERS**: The server identifies the caller only by the `token`
/// header. A different header name means every restore fails.
///
/// **BUG THIS CATCHES**: Would catch a renamed header or an `Authorization: Bearer` scheme.
#[tokio::test]
async fn given_valid_token_when_check_then_returns_user() {
    // GIVEN: A server accepting the token
    let server = MockServer::start().await;
    let token = mint_token(ALICE_ID);
    Mock::given(method("GET"))
        .and(path("/api/auth/check"))
        .and(header("token", token.as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "user": alice_json() })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = AuthClient::new(&server.uri()).expect("client");

    // WHEN: Checking
    let user = client
        .check(&RedactedToken::new(token))
        .await
        .expect("check succeeds");

    // THEN: The profile is parsed from the server's field names
    assert_eq!(user.id, UserId::from(ALICE_ID));
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.full_name, "Alice Smith");
}

#[tokio::test]
async fn given_base_url_with_prefix_when_request_sent_then_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/chat/api/auth/check"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "user": alice_json() })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let client = AuthClient::new(&format!("{}/chat", server.uri())).expect("client");

    let result = client.check(&RedactedToken::new("tok")).await;

    assert!(result.is_ok());
}

/// **VALUE**: Verifies error messages come from the server body when present
/// and from the status code otherwise.
///
/// **WHY THIS MATTERS**: That message is what the user sees in the error notice.
///
/// **BUG THIS CATCHES**: Would catch a reqwest error string ("error decoding
/// response body") reaching the user instead of the server's explanation.
#[tokio::test]
async fn given_refusal_with_and_without_body_when_login_then_messages_are_mapped() {
    // GIVEN: 401 with a body for one address, bare 503 for another
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(wiremock::matchers::body_partial_json(json!({ "email": "a@example.com" })))
        .respond_with(ResponseTemplate::new(401).set_body_json(failure_body("User not found")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(wiremock::matchers::body_partial_json(json!({ "email": "b@example.com" })))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
        .mount(&server)
        .await;
    let client = AuthClient::new(&server.uri()).expect("client");

    // WHEN: Logging in as each
    let with_body = client
        .authenticate(AuthMode::Login, &Credentials::login("a@example.com", "pw"))
        .await
        .expect_err("refused");
    let without_body = client
        .authenticate(AuthMode::Login, &Credentials::login("b@example.com", "pw"))
        .await
        .expect_err("refused");

    // THEN: Server message first, status fallback second
    assert_eq!(with_body.user_message(), "User not found");
    assert_eq!(with_body.status_code(), Some(HttpStatusCode(401)));
    assert!(with_body.is_rejection());
    assert!(with_body.is_credential_refusal());
    assert_eq!(
        without_body.user_message(),
        "Request failed with status code 503"
    );
    assert!(without_body.is_rejection());
    // An outage says nothing about the credential
    assert!(!without_body.is_credential_refusal());
    assert!(without_body.is_server_error());
}

#[tokio::test]
async fn given_success_without_token_when_login_then_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "userData": alice_json() })),
        )
        .mount(&server)
        .await;
    let client = AuthClient::new(&server.uri()).expect("client");

    let error = client
        .authenticate(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await
        .expect_err("no token");

    assert!(matches!(error, ApiError::MalformedResponse { .. }));
    assert!(!error.is_rejection());
}

#[tokio::test]
async fn given_login_response_when_authenticated_then_grant_carries_token_and_message() {
    let server = MockServer::start().await;
    let token = mint_token(ALICE_ID);
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_success_body(
            alice_json(),
            &token,
            "Login successful",
        )))
        .mount(&server)
        .await;
    let client = AuthClient::new(&server.uri()).expect("client");

    let grant = client
        .authenticate(AuthMode::Login, &Credentials::login("alice@example.com", "pw"))
        .await
        .expect("granted");

    assert!(grant.token.matches(&token));
    assert_eq!(grant.user.id, UserId::from(ALICE_ID));
    assert_eq!(grant.message.as_deref(), Some("Login successful"));
    // Token never shows up in debug output
    assert!(!format!("{grant:?}").contains(&token));
}

#[tokio::test]
async fn given_nothing_listening_when_check_then_transport_error_is_not_a_rejection() {
    let client = AuthClient::new(&unreachable_url("http").await).expect("client");

    let error = client
        .check(&RedactedToken::new("tok"))
        .await
        .expect_err("unreachable");

    assert!(matches!(error, ApiError::Http { is_connection: true, .. }));
    assert!(!error.is_rejection());
}
