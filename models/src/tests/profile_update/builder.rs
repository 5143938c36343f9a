use crate::{ModelError, ProfileUpdate};

/// **VALUE**: Verifies that a builder with no fields is rejected.
///
/// **WHY THIS MATTERS**: An empty PUT would round-trip to the server only to
/// produce a confusing "nothing to update" failure toast.
///
/// **BUG THIS CATCHES**: Would catch removal of the at-least-one-field check.
#[test]
fn given_no_fields_when_build_then_returns_validation_error() {
    // GIVEN: An empty builder
    let builder = ProfileUpdate::builder();

    // WHEN: Building
    let result = builder.build();

    // THEN: Validation error naming the problem
    match result {
        Err(ModelError::Validation { message, .. }) => {
            assert!(message.contains("at least one field"));
        }
        Ok(update) => panic!("Expected validation error, got {update:?}"),
    }
}

#[test]
fn given_blank_full_name_when_build_then_returns_validation_error() {
    let result = ProfileUpdate::builder().with_full_name("   ").build();

    assert!(result.is_err(), "Whitespace-only names must be rejected");
}

#[test]
fn given_empty_profile_pic_when_build_then_returns_validation_error() {
    let result = ProfileUpdate::builder().with_profile_pic("").build();

    assert!(result.is_err());
}

/// **VALUE**: Verifies that an empty bio is accepted (it clears the bio).
///
/// **WHY THIS MATTERS**: Users must be able to remove their bio; treating the
/// empty string as invalid would make that impossible.
///
/// **BUG THIS CATCHES**: Would catch copy-pasting the full-name emptiness check
/// onto the bio field.
#[test]
fn given_empty_bio_when_build_then_succeeds() {
    let update = ProfileUpdate::builder()
        .with_bio("")
        .build()
        .expect("empty bio should be allowed");

    assert_eq!(update.bio.as_deref(), Some(""));
    assert!(update.full_name.is_none());
}

/// **VALUE**: Verifies that unset fields are omitted from the JSON body.
///
/// **WHY THIS MATTERS**: Sending `"fullName": null` could make the server
/// overwrite a field the user never touched.
///
/// **BUG THIS CATCHES**: Would catch a missing `skip_serializing_if`.
#[test]
fn given_partial_update_when_serialized_then_only_set_fields_are_sent() {
    // GIVEN: An update that only changes the name (with padding)
    let update = ProfileUpdate::builder()
        .with_full_name("  Ada Lovelace ")
        .build()
        .expect("valid update");

    // WHEN: Serializing
    let json = serde_json::to_value(&update).expect("serializable");

    // THEN: Only the trimmed name is present, under the server's field name
    assert_eq!(json, serde_json::json!({ "fullName": "Ada Lovelace" }));
}
