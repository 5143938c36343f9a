use crate::{IssuerError, TokenIssuer};

use models::UserId;

/// **VALUE**: Verifies a generated token verifies back to the same user id.
///
/// **WHY THIS MATTERS**: The auth middleware identifies the caller from this
/// claim. A mismatch would authenticate requests as the wrong user.
///
/// **BUG THIS CATCHES**: Would catch a renamed claim (`userId` vs `sub`) on only
/// one side, or validation that insists on an `exp` the issuer never sets.
#[test]
fn given_user_id_when_token_generated_then_verifies_to_same_user() {
    // GIVEN: An issuer and a user id
    let issuer = TokenIssuer::new("test-secret").expect("valid secret");
    let user_id = UserId::from("65f0c0ffee");

    // WHEN: Generating and verifying
    let token = issuer.generate_token(&user_id).expect("token generated");
    let claims = issuer.verify(&token).expect("token verifies");

    // THEN: Same user, sane issue time
    assert_eq!(claims.user_id, user_id);
    assert!(claims.iat > 0);
}

/// **VALUE**: Verifies that a token signed with another secret is rejected.
///
/// **WHY THIS MATTERS**: This is the whole point of signing.
///
/// **BUG THIS CATCHES**: Would catch `insecure_disable_signature_validation` or a
/// shared default key.
#[test]
fn given_token_from_other_secret_when_verified_then_returns_invalid() {
    let issuer = TokenIssuer::new("secret-a").expect("valid secret");
    let other = TokenIssuer::new("secret-b").expect("valid secret");
    let token = other
        .generate_token(&UserId::from("u1"))
        .expect("token generated");

    let result = issuer.verify(&token);

    assert!(matches!(result, Err(IssuerError::Invalid { .. })));
}

#[test]
fn given_garbage_when_verified_then_returns_invalid() {
    let issuer = TokenIssuer::new("secret").expect("valid secret");

    let result = issuer.verify("not-a-jwt");

    assert!(matches!(result, Err(IssuerError::Invalid { .. })));
}

#[test]
fn given_empty_secret_when_issuer_created_then_returns_secret_error() {
    let result = TokenIssuer::new("");

    assert!(matches!(result, Err(IssuerError::Secret { .. })));
}

#[test]
fn given_issuer_when_debug_formatted_then_secret_is_not_printed() {
    let issuer = TokenIssuer::new("super-secret-value").expect("valid secret");

    let debug = format!("{issuer:?}");

    assert!(!debug.contains("super-secret-value"));
}
