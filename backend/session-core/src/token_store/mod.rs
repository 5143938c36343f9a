//! Persistence for the session token.
//!
//! Exactly one value is persisted: the opaque token under a fixed key. The
//! profile is never written; it is re-fetched from the server on start.

mod file;
mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::error::store::StoreError;

use common::RedactedToken;

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "token";

pub trait TokenStore: Send + Sync {
    /// Returns the persisted token, if any.
    fn load(&self) -> Result<Option<RedactedToken>, StoreError>;

    fn save(&self, token: &RedactedToken) -> Result<(), StoreError>;

    /// Removes the persisted token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}
