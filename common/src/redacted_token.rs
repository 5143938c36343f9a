//! Session credential with redacted Debug/Display output.

use crate::{ErrorLocation, TokenError};

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

/// A server-issued session token that never exposes its value in logs.
///
/// The token is only readable through [`RedactedToken::as_str`], which is meant
/// for the two places that need it: the outgoing `token` header and the
/// token store.
#[derive(Clone)]
pub struct RedactedToken {
    inner: String,
}

impl RedactedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: token.into(),
        }
    }

    /// Raw token value for transmission or persistence.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Compares against a raw value without revealing either side in output.
    pub fn matches(&self, raw: &str) -> bool {
        self.inner == raw
    }
}

impl fmt::Debug for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedToken([REDACTED], {} chars)", self.inner.len())
    }
}

impl fmt::Display for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED TOKEN]")
    }
}

impl Drop for RedactedToken {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl serde::Serialize for RedactedToken {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(TokenError::SerializationRefused {
            message: String::from("RedactedToken cannot be serialized - use as_str() explicitly"),
            location: ErrorLocation::caller(),
        }))
    }
}
