use crate::UserProfile;

use serde::Deserialize;

/// Envelope shared by every `/api/auth/*` response.
///
/// The check and update-profile endpoints return the profile under `user`;
/// signup/login return it under `userData`. Both land in [`ApiResponse::user`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "userData")]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub token: Option<String>,
}

impl ApiResponse {
    /// Server message, or `fallback` when the server sent none.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }
}
