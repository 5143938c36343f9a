use crate::notifier::TerminalNotifier;

use session_core::Notice;

#[test]
fn given_notices_when_rendered_then_kind_is_prefixed() {
    assert_eq!(
        TerminalNotifier::render(&Notice::Success("Login successful".to_string())),
        "[ok] Login successful"
    );
    assert_eq!(
        TerminalNotifier::render(&Notice::Error("Invalid credentials".to_string())),
        "[error] Invalid credentials"
    );
}
