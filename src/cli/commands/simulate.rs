//! Headless playback against a simulated audio device.
//!
//! The sink half goes to the engine; the device half is advanced by the
//! command loop. Events flow back over a crossbeam channel and are folded
//! into the engine between ticks, the same way a real host would. With the
//! `os-media-controls` feature the OS media keys drive the run as well.

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::model::{PlayableUrl, SourceHandle};
use crate::player::{
    AnimationClock, MediaAction, MediaSink, PlaybackEngine, SinkEvent, format_seconds,
};
use crate::prefs::PreferenceStore;
use crate::scanner;

/// Real time between loop ticks.
const TICK: Duration = Duration::from_millis(10);
/// Simulated seconds per tick.
const STEP_SECONDS: f64 = 0.5;

/// Options for [`cmd_simulate`].
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub seconds: f64,
    pub track_length: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Default)]
struct Transport {
    loaded: Option<PlayableUrl>,
    playing: bool,
    position: f64,
}

/// Engine-facing half of the simulated device.
pub struct SimulatedSink {
    transport: Arc<Mutex<Transport>>,
    events: Sender<SinkEvent>,
    track_length: f64,
}

/// Loop-facing half: advances time and reports progress.
pub struct SimulatedDevice {
    transport: Arc<Mutex<Transport>>,
    events: Sender<SinkEvent>,
    track_length: f64,
}

/// Create a connected sink/device pair and the event receiver.
pub fn simulated_device(track_length: f64) -> (SimulatedSink, SimulatedDevice, Receiver<SinkEvent>) {
    let transport = Arc::new(Mutex::new(Transport::default()));
    let (tx, rx) = unbounded();
    (
        SimulatedSink {
            transport: transport.clone(),
            events: tx.clone(),
            track_length,
        },
        SimulatedDevice {
            transport,
            events: tx,
            track_length,
        },
        rx,
    )
}

impl SimulatedSink {
    fn emit(&self, event: SinkEvent) {
        // Nobody listening is fine for listing-only runs
        let _ = self.events.send(event);
    }
}

impl MediaSink for SimulatedSink {
    fn load(&mut self, url: &PlayableUrl, source: &SourceHandle) {
        debug!(target: "cli::simulate", %url, source = %source.path().display(), "Device load");
        {
            let mut t = self.transport.lock();
            t.loaded = Some(url.clone());
            t.playing = false;
            t.position = 0.0;
        }
        self.emit(SinkEvent::MetadataLoaded {
            duration: self.track_length,
        });
    }

    fn unload(&mut self) {
        let mut t = self.transport.lock();
        t.loaded = None;
        t.playing = false;
        t.position = 0.0;
    }

    fn play(&mut self) {
        let event = {
            let mut t = self.transport.lock();
            match t.loaded.clone() {
                None => None,
                Some(url) if self.track_length <= 0.0 => Some(SinkEvent::PlayRejected {
                    url,
                    reason: "empty track".into(),
                }),
                Some(_) => {
                    // Playing from the end starts over
                    if t.position >= self.track_length {
                        t.position = 0.0;
                    }
                    let was_playing = std::mem::replace(&mut t.playing, true);
                    (!was_playing).then_some(SinkEvent::Play)
                }
            }
        };
        if let Some(event) = event {
            self.emit(event);
        }
    }

    fn pause(&mut self) {
        let was_playing = {
            let mut t = self.transport.lock();
            std::mem::replace(&mut t.playing, false)
        };
        if was_playing {
            self.emit(SinkEvent::Pause);
        }
    }

    fn seek(&mut self, seconds: f64) {
        let mut t = self.transport.lock();
        t.position = seconds.clamp(0.0, self.track_length.max(0.0));
    }

    fn set_volume(&mut self, volume: f32) {
        debug!(target: "cli::simulate", volume, "Device volume");
    }
}

impl SimulatedDevice {
    /// Advance playback by `seconds`, emitting time updates and `Ended`.
    pub fn advance(&self, seconds: f64) {
        let mut t = self.transport.lock();
        if !t.playing || t.loaded.is_none() {
            return;
        }
        t.position = (t.position + seconds).min(self.track_length);
        let _ = self.events.send(SinkEvent::TimeUpdate(t.position));
        if t.position >= self.track_length {
            t.playing = false;
            let _ = self.events.send(SinkEvent::Pause);
            let _ = self.events.send(SinkEvent::Ended);
        }
    }
}

/// Fold every pending device event into the engine.
fn drain<S: MediaSink, P: PreferenceStore>(engine: &mut PlaybackEngine<S, P>, events: &Receiver<SinkEvent>) {
    while let Ok(event) = events.try_recv() {
        engine.handle_sink_event(event);
    }
}

/// Apply every pending OS media-key press.
fn drain_actions<S: MediaSink, P: PreferenceStore>(
    engine: &mut PlaybackEngine<S, P>,
    actions: &Receiver<MediaAction>,
) {
    while let Ok(action) = actions.try_recv() {
        engine.handle_media_action(action);
    }
}

/// Publish to the OS media controls and take their button presses.
#[cfg(feature = "os-media-controls")]
fn attach_media_controls<S: MediaSink, P: PreferenceStore>(
    engine: PlaybackEngine<S, P>,
) -> (PlaybackEngine<S, P>, Option<Receiver<MediaAction>>) {
    match crate::player::OsMediaControls::new() {
        Some(controls) => {
            let actions = controls.actions();
            info!(target: "cli::simulate", "OS media controls attached");
            (engine.with_session(Box::new(controls)), Some(actions))
        }
        None => (engine, None),
    }
}

#[cfg(not(feature = "os-media-controls"))]
fn attach_media_controls<S: MediaSink, P: PreferenceStore>(
    engine: PlaybackEngine<S, P>,
) -> (PlaybackEngine<S, P>, Option<Receiver<MediaAction>>) {
    (engine, None)
}

/// Play a folder for a fixed amount of simulated time.
pub fn cmd_simulate(
    rt: &Runtime,
    store: Box<dyn PreferenceStore>,
    path: &Path,
    options: &SimulateOptions,
) -> anyhow::Result<()> {
    if !path.is_dir() {
        return Err(crate::error::Error::not_found(path).into());
    }
    let entries = rt.block_on(scanner::collect(path.to_path_buf()));

    let (sink, device, events) = simulated_device(options.track_length);
    let engine = match options.seed {
        Some(seed) => PlaybackEngine::with_seed(sink, store, seed),
        None => PlaybackEngine::new(sink, store),
    };
    let (mut engine, media_actions) = attach_media_controls(engine);
    let count = engine.load_collection(entries)?;
    println!(
        "Loaded {} songs (shuffle: {}, repeat: {})",
        count,
        if engine.state().shuffle { "on" } else { "off" },
        engine.state().repeat
    );

    let clock = AnimationClock::new();
    let frames = Arc::new(AtomicU64::new(0));
    let _wave = engine.state().visualization.then(|| {
        let frames = frames.clone();
        clock.subscribe(move |_phase| {
            frames.fetch_add(1, Ordering::Relaxed);
        })
    });

    let Some(first) = engine.sorted_ids().into_iter().next() else {
        return Ok(());
    };
    engine.play_song(&first);
    drain(&mut engine, &events);

    let mut last = (None, false);
    let mut elapsed = 0.0;
    rt.block_on(async {
        let mut interval = tokio::time::interval(TICK);
        while elapsed < options.seconds {
            interval.tick().await;
            elapsed += STEP_SECONDS;
            device.advance(STEP_SECONDS);
            drain(&mut engine, &events);
            if let Some(actions) = &media_actions {
                drain_actions(&mut engine, actions);
                drain(&mut engine, &events);
            }
            clock.tick(elapsed * 1000.0);

            let now = (
                engine.current_song().map(|s| s.name.clone()),
                engine.state().is_playing,
            );
            if now != last {
                match &now {
                    (Some(name), true) => println!(
                        "[{:>7}] playing  {} ({})",
                        format_seconds(elapsed),
                        name,
                        engine.state().duration_str()
                    ),
                    (Some(name), false) => println!(
                        "[{:>7}] stopped  {} at {}",
                        format_seconds(elapsed),
                        name,
                        engine.state().position_str()
                    ),
                    (None, _) => println!("[{:>7}] idle", format_seconds(elapsed)),
                }
                last = now;
            }
            // Media keys can resume a stopped run
            if !engine.state().is_playing && media_actions.is_none() {
                break;
            }
        }
    });

    info!(
        target: "cli::simulate",
        frames = frames.load(Ordering::Relaxed),
        phase = clock.phase(),
        "Simulation finished"
    );
    engine.shutdown();
    Ok(())
}
