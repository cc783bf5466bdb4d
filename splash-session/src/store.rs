//! Persisted "phone logged in" flag.
//!
//! Phone-number logins do not always leave an identity-provider session
//! behind, so the login flow also writes a flag to device storage. The file
//! store keeps the same layout as a secure-storage plugin: a flat JSON object
//! of string keys to string values.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Key under which the phone-login flag is stored.
pub const PHONE_LOGIN_KEY: &str = "isPhoneLoggedIn";

/// Error types for the persisted-login store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying storage could not be read or written
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored content is not a JSON object of strings
    #[error("Malformed store content: {0}")]
    Parse(#[from] serde_json::Error),

    /// Flag holds something other than "true" or "false"
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// Storage backend refused access (e.g. keychain locked)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Store that records whether the user finished a phone-number login.
#[async_trait]
pub trait PhoneLoginStore: Send + Sync {
    /// Whether the phone-login flag is set.
    async fn is_phone_logged_in(&self) -> Result<bool, StoreError>;
}

/// Phone-login store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FilePhoneLoginStore {
    path: PathBuf,
}

impl FilePhoneLoginStore {
    /// Create a store over the given file. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set or clear the phone-login flag, keeping any other keys.
    pub async fn set_phone_logged_in(&self, logged_in: bool) -> Result<(), StoreError> {
        let mut entries = self.read_entries().await?;
        entries.insert(PHONE_LOGIN_KEY.to_string(), logged_in.to_string());
        self.write_entries(&entries).await?;

        info!(path = %self.path.display(), logged_in, "Phone login flag written");
        Ok(())
    }

    /// Remove every stored key (logout).
    pub async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Phone login store cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No phone login store yet");
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl PhoneLoginStore for FilePhoneLoginStore {
    async fn is_phone_logged_in(&self) -> Result<bool, StoreError> {
        let entries = self.read_entries().await?;

        match entries.get(PHONE_LOGIN_KEY).map(String::as_str) {
            None => Ok(false),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(StoreError::InvalidValue {
                key: PHONE_LOGIN_KEY.to_string(),
                value: other.to_string(),
            }),
        }
    }
}
