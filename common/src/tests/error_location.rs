use crate::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every error enum in the workspace embeds an ErrorLocation.
/// If capture breaks, all session/API/realtime errors lose their debugging value.
///
/// **BUG THIS CATCHES**: Would catch if file path or line capture stops working.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: An ErrorLocation built from the current line
    let expected_line = line!() + 1;
    let location = ErrorLocation::from(Location::caller());

    // THEN: File and line point at this test
    assert!(location.file.contains("error_location.rs"));
    assert_eq!(location.line, expected_line, "Should capture correct line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies the `[file:line:column]` Display format.
///
/// **WHY THIS MATTERS**: Error messages are appended with this suffix; log parsing
/// and humans both rely on the bracketed shape.
///
/// **BUG THIS CATCHES**: Would catch a Display change that drops brackets or fields.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::caller();

    // WHEN: Formatting as string
    let formatted = format!("{location}");

    // THEN: "[file:line:column]"
    assert!(formatted.starts_with('['));
    assert!(formatted.ends_with(']'));
    assert_eq!(formatted.matches(':').count(), 2);
    assert!(formatted.contains(&location.line.to_string()));
}

#[track_caller]
fn raise() -> ErrorLocation {
    ErrorLocation::caller()
}

/// **VALUE**: Verifies `caller()` reports the site that called a
/// `#[track_caller]` constructor, not the constructor itself.
///
/// **WHY THIS MATTERS**: The `From` impls on every error enum build their
/// location this way. Pointing at the impl would make every error of a kind
/// report the same line.
///
/// **BUG THIS CATCHES**: Would catch `caller()` losing `#[track_caller]`.
#[test]
fn given_track_caller_helper_when_called_then_location_is_call_site() {
    // GIVEN/WHEN: A location raised through a tracking helper
    let expected_line = line!() + 1;
    let location = raise();

    // THEN: It points here
    assert!(location.file.contains("error_location.rs"));
    assert_eq!(location.line, expected_line);
}
