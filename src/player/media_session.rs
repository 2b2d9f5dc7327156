//! Host "now playing" surfaces: the OS media session and the window title.

/// Title shown when nothing is playing.
pub const DEFAULT_TITLE: &str = "Music";
/// Fixed artist label published with every song.
pub const SESSION_ARTIST: &str = "Music";
/// Fixed album label published with every song.
pub const SESSION_ALBUM: &str = "Music Player";

/// Metadata published for the current song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl NowPlaying {
    /// Metadata for a song name with the fixed artist/album labels.
    pub fn for_song(name: impl Into<String>) -> Self {
        Self {
            title: name.into(),
            artist: SESSION_ARTIST.to_string(),
            album: SESSION_ALBUM.to_string(),
        }
    }
}

/// Playback flag published to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPlaybackState {
    /// No current song
    None,
    Playing,
    Paused,
}

/// Actions the OS media session can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaAction {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
}

/// Receiver of now-playing updates.
pub trait MediaSession {
    /// Publish metadata, or clear it with `None`.
    fn set_metadata(&mut self, metadata: Option<&NowPlaying>);

    fn set_playback_state(&mut self, state: SessionPlaybackState);

    /// Update the window/tab title. Hosts without one ignore it.
    fn set_document_title(&mut self, _title: &str) {}
}
