use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("Session State Error: {message} {location}")]
    State {
        message: String,
        location: ErrorLocation,
    },
}
