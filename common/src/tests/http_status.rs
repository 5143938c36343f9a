use crate::HttpStatusCode;

#[test]
fn given_status_codes_when_classified_then_ranges_match() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(204).is_success());
    assert!(!HttpStatusCode(404).is_success());
    assert!(!HttpStatusCode(404).is_server_error());
    assert!(HttpStatusCode(503).is_server_error());
    assert!(!HttpStatusCode(200).is_server_error());
}

/// **VALUE**: Verifies which statuses count as a refused credential.
///
/// **WHY THIS MATTERS**: Session restore drops the persisted token only when the
/// server refuses it; a 500 must not log the user out permanently.
///
/// **BUG THIS CATCHES**: Would catch widening the check to all 4xx/5xx codes.
#[test]
fn given_auth_statuses_when_checked_then_only_401_and_403_are_rejections() {
    assert!(HttpStatusCode(401).is_auth_rejection());
    assert!(HttpStatusCode(403).is_auth_rejection());
    assert!(!HttpStatusCode(400).is_auth_rejection());
    assert!(!HttpStatusCode(500).is_auth_rejection());
}

#[test]
fn given_status_code_when_displayed_then_prints_number() {
    assert_eq!(HttpStatusCode::from(418).to_string(), "418");
}
