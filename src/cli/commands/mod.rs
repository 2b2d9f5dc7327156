//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `list`: print a folder's playlist as the player would order it
//! - `simulate`: drive the engine with a simulated media sink

mod list;
mod simulate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing::info;

use crate::prefs::{FileStore, MemoryStore, PreferenceStore};

pub use list::cmd_list;
pub use simulate::{SimulateOptions, cmd_simulate};

/// musebox CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Preference file to use instead of the default location
    #[arg(long, global = true, env = "MUSEBOX_PREFS")]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// List the playable songs in a folder
    List {
        /// Folder to load
        path: PathBuf,
        /// Only show favorites
        #[arg(long)]
        favorites: bool,
        /// Case-insensitive name filter
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Play a folder against a simulated audio device
    Simulate {
        /// Folder to load
        path: PathBuf,
        /// Simulated seconds to run for
        #[arg(long, default_value = "60")]
        seconds: f64,
        /// Length of every simulated track in seconds
        #[arg(long, default_value = "20")]
        track_length: f64,
        /// Seed for shuffle (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was specified.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let rt = Runtime::new()?;

    match &cli.command {
        Some(Commands::List {
            path,
            favorites,
            search,
        }) => {
            let store = open_store(cli.prefs.as_ref());
            cmd_list(&rt, store, path, *favorites, search.as_deref())?;
            Ok(true)
        }
        Some(Commands::Simulate {
            path,
            seconds,
            track_length,
            seed,
        }) => {
            let store = open_store(cli.prefs.as_ref());
            let options = SimulateOptions {
                seconds: *seconds,
                track_length: *track_length,
                seed: *seed,
            };
            cmd_simulate(&rt, store, path, &options)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Open the preference store: explicit path, then the default location,
/// then an in-memory fallback.
pub(crate) fn open_store(path: Option<&PathBuf>) -> Box<dyn PreferenceStore> {
    if let Some(path) = path {
        info!(target: "prefs", path = %path.display(), "Using preference file");
        return Box::new(FileStore::open(path.clone()));
    }
    match FileStore::open_default() {
        Some(store) => {
            info!(target: "prefs", path = %store.path().display(), "Using preference file");
            Box::new(store)
        }
        None => Box::new(MemoryStore::new()),
    }
}
