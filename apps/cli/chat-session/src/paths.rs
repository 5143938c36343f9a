//! Where the client keeps its files.

use crate::error::AppError;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "chat-session";

/// Config and log directories for one run.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    /// Platform directories (`dirs`), falling back to `./.chat-session`.
    pub fn from_platform() -> Self {
        let fallback = || PathBuf::from(".").join(format!(".{APP_DIR_NAME}"));

        let config_dir = dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(fallback);
        let log_dir = dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
            .unwrap_or_else(|| fallback().join("logs"));

        Self {
            config_dir,
            log_dir,
        }
    }

    /// Both directories under `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            log_dir: root.join("logs"),
        }
    }

    /// Creates both directories.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::App`] naming the directory that could not be created.
    #[track_caller]
    pub fn ensure(&self) -> Result<(), AppError> {
        for dir in [&self.config_dir, &self.log_dir] {
            create_dir_all(dir).map_err(|e| AppError::App {
                message: format!("Failed to create directory {}: {e}", dir.display()),
                location: ErrorLocation::caller(),
            })?;
        }
        Ok(())
    }
}
