//! The media sink: the device that actually renders audio.
//!
//! The engine is the sink's only owner. Commands go in through
//! [`MediaSink`]; what the sink actually did comes back asynchronously as
//! [`SinkEvent`]s, which the engine folds into its state.

use crate::model::{PlayableUrl, SourceHandle};

/// Commands the engine issues to the rendering device.
pub trait MediaSink {
    /// Switch the loaded source.
    fn load(&mut self, url: &PlayableUrl, source: &SourceHandle);

    /// Drop the loaded source so its URL is no longer referenced.
    fn unload(&mut self);

    /// Request playback. Fire-and-forget: a refusal is reported later as
    /// [`SinkEvent::PlayRejected`].
    fn play(&mut self);

    fn pause(&mut self);

    /// Set the playback position in seconds.
    fn seek(&mut self, seconds: f64);

    /// Set output volume (0.0 - 1.0).
    fn set_volume(&mut self, volume: f32);
}

impl<T: MediaSink + ?Sized> MediaSink for Box<T> {
    fn load(&mut self, url: &PlayableUrl, source: &SourceHandle) {
        (**self).load(url, source)
    }

    fn unload(&mut self) {
        (**self).unload()
    }

    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds)
    }

    fn set_volume(&mut self, volume: f32) {
        (**self).set_volume(volume)
    }
}

/// Notifications from the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    /// Playback position changed (seconds)
    TimeUpdate(f64),
    /// The loaded source reported its length (seconds)
    MetadataLoaded { duration: f64 },
    /// The loaded source played to its end
    Ended,
    /// The sink started playing
    Play,
    /// The sink paused
    Pause,
    /// A play request for `url` was refused
    PlayRejected { url: PlayableUrl, reason: String },
}

/// Command log entry, used by sinks that record what they were asked.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCommand {
    Load(PlayableUrl),
    Unload,
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
}
