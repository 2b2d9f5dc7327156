//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum
//! - [`StorageError`]: preference store failures, never fatal
//!
//! Nothing here is fatal to playback. The engine surfaces
//! [`Error::NoAudioFilesFound`] to its caller; storage failures are logged
//! where they happen and the default or in-memory value is used instead.

use std::path::PathBuf;

pub use crate::prefs::StorageError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The selected folder contained no audio-typed entries
    #[error("No audio files found in the selected folder")]
    NoAudioFilesFound,

    /// Folder not found or not a directory
    #[error("Folder not found: {0}")]
    NotFound(PathBuf),
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }
}
