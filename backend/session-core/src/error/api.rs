//! Errors from the auth HTTP endpoints.
//!
//! Every variant keeps the bare message separately from its location so the
//! session layer can show [`ApiError::user_message`] in a notification without
//! leaking source paths to the user.

use common::{ErrorLocation, HttpStatusCode};

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    /// The server answered but refused the request (`success: false` or non-2xx).
    #[error("Rejected: {message} (status {status}) {location}")]
    Rejected {
        message: String,
        status: HttpStatusCode,
        location: ErrorLocation,
    },

    /// The server reported success but left out a field the operation needs.
    #[error("Malformed Response: {message} {location}")]
    MalformedResponse {
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            message: message.into(),
            status: HttpStatusCode(status),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::MalformedResponse {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    /// Text suitable for a user-facing notification.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Http { message, .. }
            | ApiError::Json { message, .. }
            | ApiError::UrlParse { message, .. }
            | ApiError::Rejected { message, .. }
            | ApiError::MalformedResponse { message, .. } => message,
        }
    }

    /// True when the server itself refused the request or credential.
    ///
    /// Transport failures are not rejections: the server may accept the same
    /// request later.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    /// True when the server examined the credential and refused it:
    /// `success: false` on a 2xx reply, or 401/403.
    ///
    /// Any other non-2xx reply (an outage, a gateway error) says nothing about
    /// the credential.
    pub fn is_credential_refusal(&self) -> bool {
        match self {
            ApiError::Rejected { status, .. } => status.is_success() || status.is_auth_rejection(),
            _ => false,
        }
    }

    /// True for a 5xx reply.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_some_and(|s| s.is_server_error())
    }

    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<url::ParseError> for ApiError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ApiError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return ApiError::Json {
                message: error.to_string(),
                location: ErrorLocation::caller(),
            };
        }

        ApiError::Http {
            message: error.to_string(),
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ApiError::Json {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
