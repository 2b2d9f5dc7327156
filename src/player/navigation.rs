//! Next/previous selection over a working playlist.
//!
//! These are pure functions of (playlist, current song, modes, randomness);
//! the engine applies the step they return. The playlist is whatever the
//! caller is looking at: the full sorted view or a filtered subset of it.

use rand::Rng;

use crate::model::{RepeatMode, SongId};

/// What the engine should do after a "next" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Switch to this song and play it
    Play(SongId),
    /// Stay parked on the current song and stop playback
    Stop,
}

/// Choose the song after `current`.
///
/// Returns `None` when the playlist is empty. In shuffle mode a random song
/// other than `current` is picked; a single-entry playlist (or one holding
/// only `current`) falls back to the whole list so playback always makes
/// progress. Otherwise the next index is taken, jumping to the first song
/// when `current` is not in the playlist. Wrapping past the end stops
/// playback unless `repeat` is [`RepeatMode::List`].
pub fn next_target<R: Rng>(
    playlist: &[SongId],
    current: &SongId,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> Option<Step> {
    if playlist.is_empty() {
        return None;
    }

    if shuffle {
        let mut candidates: Vec<&SongId> = if playlist.len() == 1 {
            Vec::new()
        } else {
            playlist.iter().filter(|id| *id != current).collect()
        };
        if candidates.is_empty() {
            candidates = playlist.iter().collect();
        }
        let pick = rng.random_range(0..candidates.len());
        return Some(Step::Play(candidates[pick].clone()));
    }

    let Some(index) = playlist.iter().position(|id| id == current) else {
        return Some(Step::Play(playlist[0].clone()));
    };

    let next = (index + 1) % playlist.len();
    if next == 0 && repeat != RepeatMode::List {
        return Some(Step::Stop);
    }
    Some(Step::Play(playlist[next].clone()))
}

/// Choose the song before `current`. Always wraps; repeat mode is ignored.
///
/// Returns `None` when the playlist is empty. Jumps to the first song when
/// `current` is not in the playlist.
pub fn prev_target(playlist: &[SongId], current: &SongId) -> Option<SongId> {
    if playlist.is_empty() {
        return None;
    }
    let target = match playlist.iter().position(|id| id == current) {
        Some(index) => (index + playlist.len() - 1) % playlist.len(),
        None => 0,
    };
    Some(playlist[target].clone())
}
