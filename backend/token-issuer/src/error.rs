use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum IssuerError {
    #[error("Secret Error: {message} {location}")]
    Secret {
        message: String,
        location: ErrorLocation,
    },

    #[error("Token Encode Error: {message} {location}")]
    Encode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Token Invalid Error: {message} {location}")]
    Invalid {
        message: String,
        location: ErrorLocation,
    },
}

impl IssuerError {
    #[track_caller]
    pub fn secret(message: impl Into<String>) -> Self {
        IssuerError::Secret {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for IssuerError {
    #[track_caller]
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        let message = match error.kind() {
            ErrorKind::InvalidToken => String::from("Invalid token format"),
            ErrorKind::InvalidSignature => String::from("Invalid token signature"),
            ErrorKind::InvalidAlgorithm => String::from("Unexpected token algorithm"),
            _ => format!("Token validation failed: {error}"),
        };

        IssuerError::Invalid {
            message,
            location: ErrorLocation::caller(),
        }
    }
}
