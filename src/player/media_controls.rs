//! OS media controls integration via souvlaki.
//!
//! This module connects the engine's [`MediaSession`] contract to the
//! platform media controls:
//! - Windows: System Media Transport Controls (SMTC)
//! - Linux: MPRIS D-Bus interface
//! - macOS: MediaCenter / Now Playing
//!
//! The controls run on a dedicated thread. Updates go in over a channel;
//! button presses come back as [`MediaAction`]s on the channel returned by
//! [`OsMediaControls::actions`], which the host loop drains.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use souvlaki::{MediaControlEvent, MediaControls, MediaMetadata, MediaPlayback, PlatformConfig};
use std::time::Duration;

use super::media_session::{MediaAction, MediaSession, NowPlaying, SessionPlaybackState};

/// Updates sent to the media controls thread.
#[derive(Debug, Clone)]
enum ControlsUpdate {
    Metadata(Option<NowPlaying>),
    PlaybackState(SessionPlaybackState),
    Shutdown,
}

/// Handle to the OS media controls.
pub struct OsMediaControls {
    update_tx: Sender<ControlsUpdate>,
    action_rx: Receiver<MediaAction>,
}

impl OsMediaControls {
    /// Initialize OS media controls.
    ///
    /// Returns `None` if the controls thread cannot be started.
    pub fn new() -> Option<Self> {
        let (update_tx, update_rx) = unbounded::<ControlsUpdate>();
        let (action_tx, action_rx) = unbounded::<MediaAction>();

        match std::thread::Builder::new()
            .name("media-controls".into())
            .spawn(move || {
                tracing::info!(target: "player::media_controls", "Media controls thread started");
                match run_media_controls(update_rx, action_tx) {
                    Ok(()) => tracing::info!(target: "player::media_controls", "Media controls thread ended normally"),
                    Err(e) => tracing::error!(target: "player::media_controls", "Media controls thread error: {}", e),
                }
            }) {
            Ok(_) => Some(Self {
                update_tx,
                action_rx,
            }),
            Err(e) => {
                tracing::error!(target: "player::media_controls", "Failed to spawn media controls thread: {}", e);
                None
            }
        }
    }

    /// Receiver for OS button presses. Stays usable after the controls are
    /// handed to the engine as its session.
    pub fn actions(&self) -> Receiver<MediaAction> {
        self.action_rx.clone()
    }
}

impl MediaSession for OsMediaControls {
    fn set_metadata(&mut self, metadata: Option<&NowPlaying>) {
        let _ = self.update_tx.send(ControlsUpdate::Metadata(metadata.cloned()));
    }

    fn set_playback_state(&mut self, state: SessionPlaybackState) {
        let _ = self.update_tx.send(ControlsUpdate::PlaybackState(state));
    }
}

impl Drop for OsMediaControls {
    fn drop(&mut self) {
        let _ = self.update_tx.send(ControlsUpdate::Shutdown);
    }
}

/// Map an OS event to the actions the engine understands.
fn map_event(event: MediaControlEvent) -> Option<MediaAction> {
    match event {
        MediaControlEvent::Play => Some(MediaAction::Play),
        MediaControlEvent::Pause => Some(MediaAction::Pause),
        MediaControlEvent::Next => Some(MediaAction::NextTrack),
        MediaControlEvent::Previous => Some(MediaAction::PreviousTrack),
        _ => None,
    }
}

fn run_media_controls(
    update_rx: Receiver<ControlsUpdate>,
    action_tx: Sender<MediaAction>,
) -> Result<(), String> {
    // SMTC wants a window handle; without one souvlaki reports an error on Windows.
    let config = PlatformConfig {
        dbus_name: "musebox",
        display_name: "Music",
        hwnd: None,
    };

    let mut controls = MediaControls::new(config)
        .map_err(|e| format!("Failed to create media controls: {:?}", e))?;

    controls
        .attach(move |event: MediaControlEvent| {
            tracing::debug!(target: "player::media_controls", "OS event received: {:?}", event);
            if let Some(action) = map_event(event)
                && let Err(e) = action_tx.send(action)
            {
                tracing::warn!(target: "player::media_controls", "Failed to forward media action: {}", e);
            }
        })
        .map_err(|e| format!("Failed to attach event handler: {:?}", e))?;

    loop {
        match update_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(ControlsUpdate::Metadata(Some(meta))) => {
                let metadata = MediaMetadata {
                    title: Some(meta.title.as_str()),
                    artist: Some(meta.artist.as_str()),
                    album: Some(meta.album.as_str()),
                    duration: None,
                    cover_url: None,
                };
                if let Err(e) = controls.set_metadata(metadata) {
                    tracing::warn!(target: "player::media_controls", "Failed to set metadata: {:?}", e);
                }
            }
            Ok(ControlsUpdate::Metadata(None)) => {
                if let Err(e) = controls.set_metadata(MediaMetadata::default()) {
                    tracing::warn!(target: "player::media_controls", "Failed to clear metadata: {:?}", e);
                }
            }
            Ok(ControlsUpdate::PlaybackState(state)) => {
                let playback = match state {
                    SessionPlaybackState::Playing => MediaPlayback::Playing { progress: None },
                    SessionPlaybackState::Paused => MediaPlayback::Paused { progress: None },
                    SessionPlaybackState::None => MediaPlayback::Stopped,
                };
                if let Err(e) = controls.set_playback(playback) {
                    tracing::debug!(target: "player::media_controls", "Failed to set playback state: {:?}", e);
                }
            }
            Ok(ControlsUpdate::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    tracing::info!(target: "player::media_controls", "Media controls shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_mapping() {
        assert_eq!(map_event(MediaControlEvent::Play), Some(MediaAction::Play));
        assert_eq!(map_event(MediaControlEvent::Next), Some(MediaAction::NextTrack));
        assert_eq!(map_event(MediaControlEvent::Previous), Some(MediaAction::PreviousTrack));
        assert_eq!(map_event(MediaControlEvent::Raise), None);
    }
}
