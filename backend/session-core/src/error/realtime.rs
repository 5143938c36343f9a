use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum RealtimeError {
    #[error("Realtime URL Error: {message} {location}")]
    Url {
        message: String,
        location: ErrorLocation,
    },

    #[error("Realtime Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for RealtimeError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        RealtimeError::Url {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for RealtimeError {
    #[track_caller]
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        RealtimeError::Connect {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
