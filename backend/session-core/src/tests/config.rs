// Unit tests for ClientConfig load/save/validate

use crate::config::ClientConfig;
use crate::error::config::ConfigError;

use tempfile::TempDir;

/// **VALUE**: Verifies that a missing config file yields defaults.
///
/// **WHY THIS MATTERS**: First launch has no config directory content at all.
/// Failing there would make the client unusable out of the box.
///
/// **BUG THIS CATCHES**: Would catch `load` treating NotFound as an error.
#[test]
fn given_missing_config_when_loaded_then_returns_defaults() {
    // GIVEN: An empty directory
    let dir = TempDir::new().expect("temp dir");

    // WHEN: Loading
    let config = ClientConfig::load(dir.path()).expect("defaults");

    // THEN: Defaults are valid and sensible
    assert_eq!(config.version, 1);
    assert_eq!(config.realtime.path, "/socket");
    assert_eq!(config.storage.token_file, "session.json");
    assert!(config.validate().is_ok());
}

#[test]
fn given_saved_config_when_loaded_then_values_round_trip() {
    // GIVEN: A customised config saved to disk
    let dir = TempDir::new().expect("temp dir");
    let mut config = ClientConfig::default();
    config.server.base_url = "https://chat.example.com".to_string();
    config.realtime.connect_max_elapsed_ms = 250;
    config.save(dir.path()).expect("saved");

    // WHEN: Loading it back
    let loaded = ClientConfig::load(dir.path()).expect("loaded");

    // THEN: Custom values survive, and no temp file is left behind
    assert_eq!(loaded.server.base_url, "https://chat.example.com");
    assert_eq!(loaded.realtime.connect_max_elapsed_ms, 250);
    assert!(!dir.path().join("config.json.tmp").exists());
}

/// **VALUE**: Verifies that sections missing from the file get their defaults.
///
/// **WHY THIS MATTERS**: Users hand-edit config.json and typically only write
/// the backend URL. Every other section must fill itself in.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[serde(default)]` on a section.
#[test]
fn given_partial_config_when_loaded_then_missing_sections_default() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "server": { "base_url": "http://10.0.0.5:5000" } }"#,
    )
    .expect("written");

    let config = ClientConfig::load(dir.path()).expect("loaded");

    assert_eq!(config.server.base_url, "http://10.0.0.5:5000");
    assert_eq!(config.server.request_timeout_secs, 30);
    assert_eq!(config.realtime.path, "/socket");
}

#[test]
fn given_corrupt_config_when_loaded_then_returns_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("config.json"), "{ not json").expect("written");

    let result = ClientConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_non_http_backend_url_when_validated_then_returns_validation_error() {
    let mut config = ClientConfig::default();
    config.server.base_url = "ftp://chat.example.com".to_string();

    let result = config.validate();

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn given_token_file_with_path_separator_when_validated_then_rejected() {
    let mut config = ClientConfig::default();
    config.storage.token_file = "../escape.json".to_string();

    assert!(config.validate().is_err());
}

#[test]
fn given_invalid_config_when_saved_then_nothing_is_written() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = ClientConfig::default();
    config.realtime.path = "socket".to_string();

    let result = config.save(dir.path());

    assert!(result.is_err());
    assert!(!dir.path().join("config.json").exists());
}

#[test]
fn given_realtime_url_override_when_validated_then_only_socket_or_http_schemes_pass() {
    let mut config = ClientConfig::default();

    config.realtime.url = Some("wss://realtime.example.com/socket".to_string());
    assert!(config.validate().is_ok());

    config.realtime.url = Some("tcp://realtime.example.com".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn given_default_config_when_serialized_then_realtime_url_is_omitted() {
    let json = serde_json::to_value(ClientConfig::default()).expect("serializable");

    assert!(json["realtime"].get("url").is_none());
}
