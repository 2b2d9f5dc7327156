//! Core data models for the player.
//!
//! Defines the primary entities: [`Song`], its identity [`SongId`], the raw
//! [`FileEntry`] a folder pick yields, and the two mode enums that drive
//! ordering and navigation ([`SortMode`], [`RepeatMode`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Stable song identity, derived from file name and size.
///
/// Used for every lookup and equality comparison instead of object identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    /// Wrap a raw id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id for a file: `"{file_name}-{size}"`.
    pub fn for_file(file_name: &str, size: u64) -> Self {
        Self(format!("{}-{}", file_name, size))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SongId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque reference to the underlying file.
///
/// The engine never inspects it; it is handed through to the media sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHandle(PathBuf);

impl SourceHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// A locator the media sink can load, issued by the URL registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayableUrl(String);

impl PlayableUrl {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayableUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file-like entry produced by the folder input.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File name including extension
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
    /// Media type, e.g. `audio/mpeg`
    pub media_type: String,
    /// Where the bytes live
    pub source: SourceHandle,
}

impl FileEntry {
    /// Whether the media type indicates audio.
    pub fn is_audio(&self) -> bool {
        self.media_type.starts_with("audio/")
    }
}

/// One playable track in the collection.
#[derive(Debug, Clone)]
pub struct Song {
    pub id: SongId,
    /// Display title (file name with the extension stripped)
    pub name: String,
    pub source: SourceHandle,
    pub url: PlayableUrl,
    /// File modification time, only used by the date sort modes
    pub date_added: DateTime<Utc>,
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

/// Strip the last extension from a file name.
///
/// `"song.mp3"` becomes `"song"`, `"a.b.flac"` becomes `"a.b"`. A trailing
/// dot or a name without a dot is returned unchanged.
pub fn display_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() && !file_name[idx + 1..].contains('/') => {
            file_name[..idx].to_string()
        }
        _ => file_name.to_string(),
    }
}

/// Ordering of the sorted view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    NameAsc,
    NameDesc,
    /// Newest first
    DateDesc,
    /// Oldest first
    DateAsc,
}

impl SortMode {
    /// Next mode in the toggle cycle.
    pub fn cycle(self) -> Self {
        match self {
            Self::NameAsc => Self::NameDesc,
            Self::NameDesc => Self::DateDesc,
            Self::DateDesc => Self::DateAsc,
            Self::DateAsc => Self::NameAsc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
        }
    }
}

impl FromStr for SortMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name-asc" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repeat mode for the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    /// Wrap from the last song back to the first
    List,
    /// Restart the current song when it ends
    Song,
}

impl RepeatMode {
    /// Next mode in the toggle cycle.
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::List,
            Self::List => Self::Song,
            Self::Song => Self::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "none",
            Self::List => "list",
            Self::Song => "song",
        }
    }
}

impl FromStr for RepeatMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::Off),
            "list" => Ok(Self::List),
            "song" => Ok(Self::Song),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown mode string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown mode: {0}")]
pub struct ModeParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_strips_extension() {
        assert_eq!(display_name("song.mp3"), "song");
        assert_eq!(display_name("a.b.flac"), "a.b");
        assert_eq!(display_name("no_extension"), "no_extension");
        assert_eq!(display_name("trailing."), "trailing.");
    }

    #[test]
    fn test_song_id_for_file() {
        assert_eq!(SongId::for_file("a.mp3", 1234).as_str(), "a.mp3-1234");
    }

    #[test]
    fn test_sort_cycle_returns_to_start() {
        let mut mode = SortMode::NameAsc;
        let mut seen = Vec::new();
        for _ in 0..4 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                SortMode::NameDesc,
                SortMode::DateDesc,
                SortMode::DateAsc,
                SortMode::NameAsc
            ]
        );
    }

    #[test]
    fn test_repeat_cycle() {
        assert_eq!(RepeatMode::Off.cycle(), RepeatMode::List);
        assert_eq!(RepeatMode::List.cycle(), RepeatMode::Song);
        assert_eq!(RepeatMode::Song.cycle(), RepeatMode::Off);
    }

    #[test]
    fn test_mode_strings_parse_back() {
        for mode in [
            SortMode::NameAsc,
            SortMode::NameDesc,
            SortMode::DateDesc,
            SortMode::DateAsc,
        ] {
            assert_eq!(mode.as_str().parse::<SortMode>(), Ok(mode));
        }
        assert_eq!("none".parse::<RepeatMode>(), Ok(RepeatMode::Off));
        assert!("shuffle".parse::<RepeatMode>().is_err());
    }
}
