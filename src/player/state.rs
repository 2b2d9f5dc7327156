//! Playback state owned by the engine.

use std::collections::BTreeSet;

use crate::model::{RepeatMode, SongId, SortMode};
use crate::prefs::Preferences;

/// The engine's mutable core.
///
/// `current_time`, `duration` and `is_playing` mirror what the media sink
/// reports; they are not independently authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Current song. Treated as absent if the id is not in the collection.
    pub current: Option<SongId>,
    pub is_playing: bool,
    /// Position in seconds
    pub current_time: f64,
    /// Track length in seconds
    pub duration: f64,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub sort: SortMode,
    /// Favorite song ids; may include ids missing from the collection
    pub favorites: BTreeSet<SongId>,
    pub visualization: bool,
    /// Volume level (0.0 - 1.0)
    pub volume: f32,
    /// Accent hue (0 - 360)
    pub hue: u16,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::from_preferences(Preferences::default())
    }
}

impl PlaybackState {
    /// Fresh state seeded with loaded preferences.
    pub fn from_preferences(prefs: Preferences) -> Self {
        Self {
            current: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            shuffle: prefs.shuffle,
            repeat: prefs.repeat,
            sort: prefs.sort,
            favorites: prefs.favorites,
            visualization: prefs.visualization,
            volume: prefs.volume,
            hue: prefs.hue,
        }
    }

    /// Format position as MM:SS.
    pub fn position_str(&self) -> String {
        format_seconds(self.current_time)
    }

    /// Format duration as MM:SS.
    pub fn duration_str(&self) -> String {
        format_seconds(self.duration)
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_seconds(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
