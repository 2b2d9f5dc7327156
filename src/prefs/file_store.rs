//! Preference store backed by a TOML file.
//!
//! The file lives in the OS-standard config directory:
//! - Windows: %APPDATA%\musebox\preferences.toml
//! - macOS: ~/Library/Application Support/musebox/preferences.toml
//! - Linux: ~/.config/musebox/preferences.toml
//!
//! It holds a single flat table of string values. The file is read once
//! when the store is opened and rewritten on every `set`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{PreferenceStore, StorageError};

/// Get the default preference file path
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("musebox").join("preferences.toml"))
}

/// TOML-file preference store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty store. Logs
    /// warnings but doesn't fail - we always return a usable store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = load_values(&path);
        Self { path, values }
    }

    /// Open the store at the default location, if one can be determined.
    pub fn open_default() -> Option<Self> {
        match default_path() {
            Some(path) => Some(Self::open(path)),
            None => {
                tracing::warn!(target: "prefs", "Could not determine config directory");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::CreateDir(dir.to_path_buf(), e))?;
        }

        let contents = toml::to_string_pretty(&self.values)?;

        // Write atomically (write to temp, then rename)
        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, &contents)
            .map_err(|e| StorageError::Write(temp_path.clone(), e))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| StorageError::Rename(temp_path, self.path.clone(), e))?;

        tracing::debug!(target: "prefs", path = %self.path.display(), "Saved preferences");
        Ok(())
    }
}

fn load_values(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        tracing::info!(target: "prefs", "No preference file at {:?}, using defaults", path);
        return BTreeMap::new();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(values) => {
                tracing::info!(target: "prefs", "Loaded preferences from {:?}", path);
                values
            }
            Err(e) => {
                tracing::error!(target: "prefs", "Failed to parse preference file {:?}: {}", path, e);
                BTreeMap::new()
            }
        },
        Err(e) => {
            tracing::error!(target: "prefs", "Failed to read preference file {:?}: {}", path, e);
            BTreeMap::new()
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::schema::{self, Preferences};

    #[test]
    fn test_values_persist_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.toml");

        let mut store = FileStore::open(&path);
        store.set("musebox-volume", "0.5").unwrap();
        store.set("musebox-repeat", "list").unwrap();
        assert!(path.exists());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("musebox-volume").unwrap().as_deref(), Some("0.5"));
        let prefs = Preferences::load(&reopened);
        assert_eq!(prefs.volume, 0.5);
        assert_eq!(prefs.repeat, crate::model::RepeatMode::List);
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("musebox-hue").unwrap(), None);
        assert_eq!(schema::HUE.read(&store), schema::DEFAULT_HUE);
    }

    #[test]
    fn test_unwritable_location_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();

        // Parent "directory" is a regular file
        let mut store = FileStore::open(blocker.join("preferences.toml"));
        assert!(store.set("musebox-hue", "10").is_err());
        // The in-memory value is still there
        assert_eq!(store.get("musebox-hue").unwrap().as_deref(), Some("10"));
    }
}
