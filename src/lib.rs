//! musebox - a local-folder music player core.
//!
//! The crate is the engine behind a single-window player: it turns a picked
//! folder into a song collection, keeps playback state, decides what plays
//! next, and persists the user's preferences. Rendering audio and drawing
//! the window are left to the host through the [`player::MediaSink`] and
//! [`player::MediaSession`] traits.

pub mod cli;
pub mod controls;
pub mod error;
pub mod library;
pub mod model;
pub mod player;
pub mod prefs;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;
