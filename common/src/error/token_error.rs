use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Errors raised by [`crate::RedactedToken`].
#[derive(Debug, ThisError)]
pub enum TokenError {
    /// Raised when something tries to write a session token out through serde.
    #[error("Session Token Serialization Refused: {message} {location}")]
    SerializationRefused {
        message: String,
        location: ErrorLocation,
    },
}
