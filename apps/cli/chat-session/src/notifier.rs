use session_core::{Notice, Notifier};

use log::debug;

/// Prints notices on the terminal, errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn render(notice: &Notice) -> String {
        match notice {
            Notice::Success(text) => format!("[ok] {text}"),
            Notice::Error(text) => format!("[error] {text}"),
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        debug!("Notice: {notice:?}");
        let line = Self::render(&notice);
        if notice.is_error() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}
