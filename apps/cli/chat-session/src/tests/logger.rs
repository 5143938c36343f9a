// Unit tests for logger module initialization logic

use crate::error::AppError;
use crate::logger::{LOG_FILE_NAME, initialize, open_log_file};

use std::path::PathBuf;

use tempfile::TempDir;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Start-up paths and tests may both initialize logging.
/// A second `fern::apply` would fail because a global logger is already set.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = TempDir::new().expect("temp dir");

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path());
    let result2 = initialize(temp_dir.path());

    // THEN: Both return Ok
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
}

/// **VALUE**: Verifies an unusable log directory is reported as an error.
///
/// **WHY THIS MATTERS**: A read-only or missing data directory must produce a
/// clear start-up error instead of a panic.
///
/// **BUG THIS CATCHES**: Would catch `fern::log_file()` being unwrapped.
#[test]
fn given_invalid_log_dir_when_log_file_opened_then_returns_app_error() {
    // GIVEN: A path below a device file, which can never be a directory
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Opening the log file
    let result = open_log_file(&invalid_dir);

    // THEN: App error, not a panic
    assert!(matches!(result, Err(AppError::App { .. })));
}

#[test]
fn given_valid_dir_when_log_file_opened_then_file_is_created() {
    let temp_dir = TempDir::new().expect("temp dir");

    open_log_file(temp_dir.path()).expect("log file");

    assert!(temp_dir.path().join(LOG_FILE_NAME).exists());
}
