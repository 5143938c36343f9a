use common::ErrorLocation;

use session_core::CoreError;

use thiserror::Error;

/// Errors surfaced by the terminal front end.
///
/// Session operations never fail this way: their failures are reported as
/// notices. These cover start-up and input handling.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from this App
    #[error("Chat Session Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Error from session-core set-up (config, client construction)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// A line typed at the prompt could not be understood
    #[error("Command Error: {message} {location}")]
    Command {
        message: String,
        location: ErrorLocation,
    },
}

impl AppError {
    #[track_caller]
    pub fn command(message: impl Into<String>) -> Self {
        AppError::Command {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    /// Text to show at the prompt, without the source location.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::App { message, .. }
            | AppError::Core { message, .. }
            | AppError::Command { message, .. } => message,
        }
    }
}

impl From<CoreError> for AppError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        AppError::Core {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
