//! Test utilities and fixtures for musebox tests.
//!
//! Provides fake collaborators for the engine (a sink that records its
//! commands, a session that records what was published, a store that
//! always fails) and builders for folder entries.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{RecordingSink, audio_entry};
//!
//! let mut engine = PlaybackEngine::with_seed(RecordingSink::default(), MemoryStore::new(), 1);
//! engine.load_collection(vec![audio_entry("a.mp3", 10, 0)]).unwrap();
//! ```

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{FileEntry, PlayableUrl, SourceHandle};
use crate::player::{
    MediaSession, MediaSink, NowPlaying, SessionPlaybackState, SinkCommand,
};
use crate::prefs::{PreferenceStore, StorageError};

/// Builds an audio entry whose last-modified time is `modified_ms` after the epoch.
pub fn audio_entry(name: &str, size: u64, modified_ms: i64) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        size,
        last_modified: DateTime::<Utc>::from_timestamp_millis(modified_ms).unwrap_or_default(),
        media_type: "audio/mpeg".to_string(),
        source: SourceHandle::new(format!("/music/{}", name)),
    }
}

/// Builds an entry with an explicit media type.
pub fn entry_with_type(name: &str, media_type: &str) -> FileEntry {
    FileEntry {
        media_type: media_type.to_string(),
        ..audio_entry(name, 1, 0)
    }
}

/// Sink that records every command.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub commands: Vec<SinkCommand>,
    pub loaded: Option<PlayableUrl>,
    pub volume: Option<f32>,
}

impl RecordingSink {
    /// Number of recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&SinkCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn last(&self) -> Option<&SinkCommand> {
        self.commands.last()
    }
}

impl MediaSink for RecordingSink {
    fn load(&mut self, url: &PlayableUrl, _source: &SourceHandle) {
        self.loaded = Some(url.clone());
        self.commands.push(SinkCommand::Load(url.clone()));
    }

    fn unload(&mut self) {
        self.loaded = None;
        self.commands.push(SinkCommand::Unload);
    }

    fn play(&mut self) {
        self.commands.push(SinkCommand::Play);
    }

    fn pause(&mut self) {
        self.commands.push(SinkCommand::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.commands.push(SinkCommand::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = Some(volume);
        self.commands.push(SinkCommand::SetVolume(volume));
    }
}

/// Everything a [`RecordingSession`] has been told.
#[derive(Debug, Default)]
pub struct SessionLog {
    pub metadata: Vec<Option<NowPlaying>>,
    pub states: Vec<SessionPlaybackState>,
    pub titles: Vec<String>,
}

/// Media session that records into a shared [`SessionLog`].
#[derive(Debug, Default, Clone)]
pub struct RecordingSession {
    pub log: Rc<RefCell<SessionLog>>,
}

impl MediaSession for RecordingSession {
    fn set_metadata(&mut self, metadata: Option<&NowPlaying>) {
        self.log.borrow_mut().metadata.push(metadata.cloned());
    }

    fn set_playback_state(&mut self, state: SessionPlaybackState) {
        self.log.borrow_mut().states.push(state);
    }

    fn set_document_title(&mut self, title: &str) {
        self.log.borrow_mut().titles.push(title.to_string());
    }
}

/// Store whose reads and writes always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl PreferenceStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".into()))
    }
}
