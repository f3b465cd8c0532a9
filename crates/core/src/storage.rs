//! File-backed key-value store
//!
//! Stands in for browser local storage: one JSON file per key under a root
//! directory, each holding a `{ "value": ..., "timestamp": ... }` envelope.
//! Reads that fail fall back to a default and writes report success as a
//! boolean; the `try_*` variants expose the underlying error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for storage operations
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    value: T,
    timestamp: i64,
}

/// Key-value store rooted at a directory
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    root: PathBuf,
}

impl KeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }

    /// Read the value stored under `key`, `None` if nothing is stored
    pub fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.key_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path)?;
        let envelope: Envelope<T> = serde_json::from_str(&raw)?;
        Ok(Some(envelope.value))
    }

    /// Read the value stored under `key`, or `default` if it is missing or unreadable
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.try_get(key) {
            Ok(Some(value)) => value,
            _ => default,
        }
    }

    /// Write `value` under `key`, stamped with the current time
    pub fn try_set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let path = self.key_path(key)?;

        // Create directory if it doesn't exist
        fs::create_dir_all(&self.root)?;

        let envelope = Envelope {
            value,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        fs::write(&path, serde_json::to_string(&envelope)?)?;
        Ok(())
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> bool {
        self.try_set(key, value).is_ok()
    }

    /// Delete the value under `key`; returns whether anything was removed
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.key_path(key)?;

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)?;
        Ok(true)
    }
}

/// Keys must be non-empty and contain only alphanumerics, hyphens and underscores
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey(
            "Storage key cannot be empty".to_string(),
        ));
    }

    if !key
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }

    Ok(())
}
