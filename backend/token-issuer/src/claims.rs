use models::UserId;

use serde::{Deserialize, Serialize};

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
}
