//! Client configuration stored as `config.json` in the app's config directory.

use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::env;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

/// Overrides `server.base_url` when set (also read from `.env`).
pub const BACKEND_URL_ENV: &str = "CHAT_BACKEND_URL";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Path of the realtime endpoint on the backend host.
    #[serde(default = "default_realtime_path")]
    pub path: String,
    /// Absolute realtime endpoint for deployments that serve it from another host.
    /// When set, `path` is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Upper bound on the time spent retrying the initial connect.
    #[serde(default = "default_connect_max_elapsed_ms")]
    pub connect_max_elapsed_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            path: default_realtime_path(),
            url: None,
            connect_max_elapsed_ms: default_connect_max_elapsed_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_token_file")]
    pub token_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub realtime: RealtimeConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            server: ServerConfig::default(),
            realtime: RealtimeConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_realtime_path() -> String {
    "/socket".to_string()
}
fn default_connect_max_elapsed_ms() -> u64 {
    10_000
}
fn default_token_file() -> String {
    "session.json".to_string()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ClientConfig {
    /// Load config from {config_dir}/config.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClientConfig)` if loaded successfully or defaults if file missing.
    /// Returns `Err(ConfigError)` if file exists but is corrupted/invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::caller(),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::caller(),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/config.json using temp file + rename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation, serialization,
    /// write, or rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::caller(),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::caller(),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Apply `CHAT_BACKEND_URL` from the process environment (or `.env`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if the override is not a valid URL.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        match env::var(BACKEND_URL_ENV) {
            Ok(url) if !url.is_empty() => {
                info!("Backend URL overridden by {BACKEND_URL_ENV}: {url}");
                self.server.base_url = url;
                self.validate()
            }
            _ => Ok(()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn connect_max_elapsed(&self) -> Duration {
        Duration::from_millis(self.realtime.connect_max_elapsed_ms)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        let url = &self.server.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: format!("Invalid backend URL format: {}", url),
            });
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: "request_timeout_secs must be greater than zero".to_string(),
            });
        }

        if !self.realtime.path.starts_with('/') {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: format!("Realtime path must start with '/': {}", self.realtime.path),
            });
        }

        if let Some(url) = &self.realtime.url {
            let supported = ["ws://", "wss://", "http://", "https://"];
            if !supported.iter().any(|scheme| url.starts_with(scheme)) {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::caller(),
                    reason: format!("Invalid realtime URL format: {}", url),
                });
            }
        }

        let token_file = &self.storage.token_file;
        if token_file.is_empty() || token_file.contains('/') || token_file.contains('\\') {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::caller(),
                reason: format!("Token file must be a bare file name: '{}'", token_file),
            });
        }

        Ok(())
    }
}
