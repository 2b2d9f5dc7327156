//! Preference persistence.
//!
//! A narrow, synchronous key/value contract ([`PreferenceStore`]) plus a
//! typed schema ([`schema`]) describing how each preference is encoded.
//! Failures never reach playback: reads fall back to defaults and writes
//! are logged while the in-memory value stays authoritative.

mod file_store;
pub mod schema;

pub use file_store::{FileStore, default_path};
pub use schema::{Pref, Preferences};

use std::collections::HashMap;
use std::path::PathBuf;

/// Flat string key/value store.
pub trait PreferenceStore {
    /// Read a key. `Ok(None)` means the key is not set.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a key.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// In-memory store, used when nothing durable is available and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with raw values.
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw stored value, bypassing the schema.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Preference storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt value for {key}: {value:?}")]
    Corrupt { key: String, value: String },

    #[error("Failed to create preference directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write preferences to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}
