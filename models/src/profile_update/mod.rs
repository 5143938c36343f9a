pub mod builder;

use builder::ProfileUpdateBuilder;

use serde::Serialize;

/// Fields submitted to `PUT /api/auth/update-profile`.
///
/// Only the fields that are set are sent. Construct through
/// [`ProfileUpdate::builder`] so an empty update never reaches the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(rename = "fullName", skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "profilePic", skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

impl ProfileUpdate {
    pub fn builder() -> ProfileUpdateBuilder {
        ProfileUpdateBuilder::default()
    }
}
