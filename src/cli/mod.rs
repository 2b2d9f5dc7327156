//! Command-line interface for musebox.
//!
//! A headless driver for the playback engine: list a folder the way the
//! player would show it, or run the engine against a simulated sink.

mod commands;

pub use commands::{Cli, Commands, run_command};
