use crate::error::store::StoreError;
use crate::token_store::{TOKEN_KEY, TokenStore};

use common::{ErrorLocation, RedactedToken};

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};

/// Token store backed by a small JSON document, `{ "token": "..." }`.
///
/// Writes go through a temp file and a rename so a crash never leaves a
/// half-written token behind.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: &Path, file_name: &str) -> Self {
        Self {
            path: dir.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Option<BTreeMap<String, String>>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Read {
                    location: ErrorLocation::caller(),
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        let entries = serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
            location: ErrorLocation::caller(),
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Some(entries))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<RedactedToken>, StoreError> {
        let token = self
            .read_entries()?
            .and_then(|mut entries| entries.remove(TOKEN_KEY))
            .filter(|t| !t.is_empty())
            .map(RedactedToken::new);

        debug!(
            "Token store {}: {}",
            self.path.display(),
            if token.is_some() { "token present" } else { "empty" }
        );
        Ok(token)
    }

    fn save(&self, token: &RedactedToken) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Write {
                location: ErrorLocation::caller(),
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let mut entries = BTreeMap::new();
        entries.insert(TOKEN_KEY, token.as_str());

        let json = serde_json::to_string(&entries).map_err(|e| StoreError::Serialize {
            location: ErrorLocation::caller(),
            reason: e.to_string(),
        })?;

        let temp_path = self.path.with_extension("tmp");

        std::fs::write(&temp_path, json).map_err(|e| StoreError::Write {
            location: ErrorLocation::caller(),
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Write {
            location: ErrorLocation::caller(),
            path: self.path.clone(),
            source: e,
        })?;

        info!("Session token saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Session token removed from {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write {
                location: ErrorLocation::caller(),
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}
