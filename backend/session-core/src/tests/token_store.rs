// Unit tests for token persistence

use crate::error::store::StoreError;
use crate::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

use common::RedactedToken;

use tempfile::TempDir;

/// **VALUE**: Verifies the token survives a "restart" (a fresh store on the same file).
///
/// **WHY THIS MATTERS**: Persisting the token is what lets the client restore
/// the session on the next launch.
///
/// **BUG THIS CATCHES**: Would catch a key mismatch between save and load.
#[test]
fn given_saved_token_when_new_store_loads_then_returns_same_token() {
    // GIVEN: A token saved through one store instance
    let dir = TempDir::new().expect("temp dir");
    let store = FileTokenStore::new(dir.path(), "session.json");
    store
        .save(&RedactedToken::new("tok-123"))
        .expect("saved");

    // WHEN: A second instance loads from the same location
    let reopened = FileTokenStore::new(dir.path(), "session.json");
    let loaded = reopened.load().expect("readable");

    // THEN: Same token
    assert_eq!(loaded.as_ref().map(RedactedToken::as_str), Some("tok-123"));
}

#[test]
fn given_saved_token_when_file_inspected_then_stored_under_token_key() {
    let dir = TempDir::new().expect("temp dir");
    let store = FileTokenStore::new(dir.path(), "session.json");
    store.save(&RedactedToken::new("tok-123")).expect("saved");

    let raw = std::fs::read_to_string(store.path()).expect("file exists");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("json");

    assert_eq!(json["token"], "tok-123");
}

#[test]
fn given_no_file_when_loaded_then_returns_none() {
    let dir = TempDir::new().expect("temp dir");
    let store = FileTokenStore::new(dir.path(), "session.json");

    assert!(store.load().expect("readable").is_none());
}

/// **VALUE**: Verifies that clearing is idempotent.
///
/// **WHY THIS MATTERS**: Logout always clears the store, including when the
/// user was never logged in. An error there would surface as a warning on
/// every logout.
///
/// **BUG THIS CATCHES**: Would catch `remove_file` NotFound being propagated.
#[test]
fn given_cleared_store_when_cleared_again_then_succeeds() {
    let dir = TempDir::new().expect("temp dir");
    let store = FileTokenStore::new(dir.path(), "session.json");
    store.save(&RedactedToken::new("tok")).expect("saved");

    store.clear().expect("first clear");
    store.clear().expect("second clear");

    assert!(store.load().expect("readable").is_none());
}

#[test]
fn given_corrupt_file_when_loaded_then_returns_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("session.json"), "garbage").expect("written");
    let store = FileTokenStore::new(dir.path(), "session.json");

    assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
}

#[test]
fn given_memory_store_clones_when_one_saves_then_other_sees_token() {
    let store = MemoryTokenStore::new();
    let clone = store.clone();

    store.save(&RedactedToken::new("shared")).expect("saved");

    assert!(
        clone
            .load()
            .expect("readable")
            .is_some_and(|t| t.matches("shared"))
    );
    clone.clear().expect("cleared");
    assert!(store.load().expect("readable").is_none());
}
