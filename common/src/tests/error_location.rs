use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation` Display produces the `[file:line:column]` format.
///
/// **WHY THIS MATTERS**: Every gateway, config and session error embeds its location in the
/// rendered message. If the format breaks, logs lose the pointer back to the failing call.
///
/// **BUG THIS CATCHES**: Would catch if the Display implementation drops the brackets,
/// the file path, or one of the numeric components.
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation for this call site
    let location = ErrorLocation::from(Location::caller());

    // WHEN: Formatting as string
    let formatted = format!("{}", location);

    // THEN: Should produce "[file:line:column]"
    assert!(formatted.starts_with('['));
    assert!(formatted.ends_with(']'));
    assert!(formatted.contains(&location.line.to_string()));
    assert_eq!(formatted.matches(':').count(), 2, "Should have exactly 2 colons");
}

/// **VALUE**: Verifies that `#[track_caller]` helpers report the caller, not the helper.
///
/// **BUG THIS CATCHES**: Would catch if error constructors lose `#[track_caller]`, which
/// would make every error point at the constructor instead of the failing request.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    // GIVEN: A helper function that captures location
    #[track_caller]
    fn capture_location() -> ErrorLocation {
        ErrorLocation::from(Location::caller())
    }

    // WHEN: Capturing location from consecutive lines
    let first = capture_location();
    let second = capture_location();

    // THEN: Same file, sequential lines
    assert_eq!(first.file, second.file);
    assert!(first.file.contains("error_location.rs"));
    assert_eq!(first.line + 1, second.line, "Lines should be sequential");
}
