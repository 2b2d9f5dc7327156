//! Playback engine and the host surfaces it drives.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  PlaybackEngine (host thread)                   │
//! │   Owns the library, playback state and preference write-back   │
//! └───────┬──────────────────────┬──────────────────────┬───────────┘
//!         │ MediaSink commands   │ MediaSession updates │ PreferenceStore
//!         ▼                      ▼                      ▼
//!   audio device            OS "now playing"        key/value store
//!         │
//!         │ SinkEvent (time, duration, ended, play/pause, rejected)
//!         └──────────────► PlaybackEngine::handle_sink_event
//! ```
//!
//! The engine is single-threaded and event-driven: every mutation happens
//! in a method call, and the sink reports back by feeding events in.

mod clock;
mod engine;
mod media_session;
pub mod navigation;
mod sink;
mod state;

#[cfg(feature = "os-media-controls")]
mod media_controls;

pub use clock::{AnimationClock, Subscription};
pub use engine::PlaybackEngine;
pub use media_session::{
    DEFAULT_TITLE, MediaAction, MediaSession, NowPlaying, SESSION_ALBUM, SESSION_ARTIST,
    SessionPlaybackState,
};
pub use navigation::Step;
pub use sink::{MediaSink, SinkCommand, SinkEvent};
pub use state::{PlaybackState, format_seconds};

#[cfg(feature = "os-media-controls")]
pub use media_controls::OsMediaControls;
