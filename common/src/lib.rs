//! Shared building blocks for the chat session workspace.
//!
//! Everything here is free of I/O and business rules:
//!
//! - [`ErrorLocation`]: file/line/column captured with `#[track_caller]`
//! - [`HttpStatusCode`]: status classification for HTTP failures
//! - [`RedactedToken`]: a session credential that never prints or serializes

pub mod error;
pub mod http_status;
pub mod redacted_token;

pub use error::error_location::ErrorLocation;
pub use error::token_error::TokenError;
pub use http_status::HttpStatusCode;
pub use redacted_token::RedactedToken;

#[cfg(test)]
mod tests;
