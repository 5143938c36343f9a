//! Server-side session token issuance.
//!
//! Tokens are HS256 JWTs signed with a process-wide secret. The only claims
//! are the user id and the issue time; tokens do not expire.

pub mod claims;
pub mod error;
pub mod issuer;

pub use claims::TokenClaims;
pub use error::IssuerError;
pub use issuer::{JWT_SECRET_ENV, TokenIssuer};

#[cfg(test)]
mod tests;
