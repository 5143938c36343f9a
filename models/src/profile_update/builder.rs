use crate::ModelError;
use crate::ProfileUpdate;

use common::ErrorLocation;

/// Builder for validated [`ProfileUpdate`] instances.
#[derive(Debug, Default)]
pub struct ProfileUpdateBuilder {
    full_name: Option<String>,
    bio: Option<String>,
    profile_pic: Option<String>,
}

impl ProfileUpdateBuilder {
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_profile_pic(mut self, pic: impl Into<String>) -> Self {
        self.profile_pic = Some(pic.into());
        self
    }

    /// Build the update with validation.
    ///
    /// A bio may be set to the empty string (clearing it); a full name may not.
    #[track_caller]
    pub fn build(self) -> Result<ProfileUpdate, ModelError> {
        if self.full_name.is_none() && self.bio.is_none() && self.profile_pic.is_none() {
            return Err(ModelError::Validation {
                message: String::from("Profile update must set at least one field"),
                location: ErrorLocation::caller(),
            });
        }

        let full_name = self.full_name.map(|n| n.trim().to_string());

        if full_name.as_deref().is_some_and(str::is_empty) {
            return Err(ModelError::Validation {
                message: String::from("Full name cannot be empty"),
                location: ErrorLocation::caller(),
            });
        }

        if self.profile_pic.as_deref().is_some_and(str::is_empty) {
            return Err(ModelError::Validation {
                message: String::from("Profile picture cannot be empty"),
                location: ErrorLocation::caller(),
            });
        }

        Ok(ProfileUpdate {
            full_name,
            bio: self.bio,
            profile_pic: self.profile_pic,
        })
    }
}
