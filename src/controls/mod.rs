//! Presentation policies layered over the engine.
//!
//! These are the decisions a player surface makes before calling into the
//! engine: whether "previous" restarts the song, and whether a pointer
//! gesture on the progress bar was a tap or a scrub.

mod gesture;

pub use gesture::{DRAG_THRESHOLD_PX, ScrubAction, ScrubGesture};

use tracing::debug;

use crate::model::SongId;
use crate::player::{MediaSink, PlaybackEngine};
use crate::prefs::PreferenceStore;

/// Seconds into a song after which "previous" restarts it instead.
pub const RESTART_THRESHOLD: f64 = 3.0;

/// "Previous" button policy.
///
/// Past [`RESTART_THRESHOLD`] seconds the current song restarts; otherwise
/// the previous song in `playlist` plays.
pub fn previous_or_restart<S: MediaSink, P: PreferenceStore>(
    engine: &mut PlaybackEngine<S, P>,
    playlist: &[SongId],
) {
    if engine.current_song().is_none() {
        return;
    }
    if engine.state().current_time > RESTART_THRESHOLD {
        debug!(target: "controls", "Restarting current song");
        engine.seek(0.0);
    } else {
        engine.play_prev_in(playlist);
    }
}

/// Apply a finished gesture to the engine.
pub fn apply_scrub<S: MediaSink, P: PreferenceStore>(
    engine: &mut PlaybackEngine<S, P>,
    action: ScrubAction,
) {
    match action {
        ScrubAction::TogglePlay => engine.toggle_play_pause(),
        ScrubAction::Seek(fraction) => {
            let duration = engine.state().duration;
            if duration > 0.0 {
                engine.seek(fraction.clamp(0.0, 1.0) * duration);
            }
        }
    }
}
