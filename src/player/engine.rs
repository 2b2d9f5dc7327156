//! The queue/playback engine.
//!
//! # Control Flow
//!
//! User intent (play, next, scrub, toggle shuffle) calls an engine method,
//! which mutates [`PlaybackState`] and issues commands to the [`MediaSink`].
//! The sink reports back through [`PlaybackEngine::handle_sink_event`]; on
//! `Ended` the navigation algorithm runs. OS media keys arrive through
//! [`PlaybackEngine::handle_media_action`] and take the same code path as
//! direct calls.
//!
//! Every change of current song or play state is published to the optional
//! [`MediaSession`] (metadata, playback flag, window title).

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use super::media_session::{
    DEFAULT_TITLE, MediaAction, MediaSession, NowPlaying, SessionPlaybackState,
};
use super::navigation::{self, Step};
use super::sink::{MediaSink, SinkEvent};
use super::state::PlaybackState;
use crate::error::{Error, Result};
use crate::library::{self, Library, PlaylistFilter};
use crate::model::{FileEntry, PlayableUrl, RepeatMode, Song, SongId, SortMode};
use crate::prefs::schema::{self, MAX_HUE};
use crate::prefs::{PreferenceStore, Preferences};

/// What was last pushed to the media session.
#[derive(Debug, Clone, PartialEq)]
struct Published {
    song: Option<SongId>,
    playing: bool,
}

/// Owns the collection, the playback state and the media sink.
pub struct PlaybackEngine<S: MediaSink, P: PreferenceStore> {
    library: Library,
    state: PlaybackState,
    sink: S,
    store: P,
    session: Option<Box<dyn MediaSession>>,
    rng: StdRng,
    /// URL currently loaded into the sink
    loaded: Option<PlayableUrl>,
    published: Option<Published>,
    shut_down: bool,
}

impl<S: MediaSink, P: PreferenceStore> PlaybackEngine<S, P> {
    /// Create an engine, loading preferences from `store`.
    pub fn new(sink: S, store: P) -> Self {
        Self::with_rng(sink, store, StdRng::from_os_rng())
    }

    /// Create an engine with deterministic shuffle.
    pub fn with_seed(sink: S, store: P, seed: u64) -> Self {
        Self::with_rng(sink, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut sink: S, store: P, rng: StdRng) -> Self {
        let prefs = Preferences::load(&store);
        info!(
            target: "player::engine",
            volume = prefs.volume,
            shuffle = prefs.shuffle,
            repeat = %prefs.repeat,
            sort = %prefs.sort,
            favorites = prefs.favorites.len(),
            "Preferences loaded"
        );
        sink.set_volume(prefs.volume);

        Self {
            library: Library::new(),
            state: PlaybackState::from_preferences(prefs),
            sink,
            store,
            session: None,
            rng,
            loaded: None,
            published: None,
            shut_down: false,
        }
    }

    /// Attach a media session and publish the current state to it.
    pub fn with_session(mut self, session: Box<dyn MediaSession>) -> Self {
        self.session = Some(session);
        self.published = None;
        self.publish();
        self
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Songs in load order.
    pub fn songs(&self) -> &[Song] {
        self.library.songs()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// The current song, if its id is still in the collection.
    pub fn current_song(&self) -> Option<&Song> {
        self.state
            .current
            .as_ref()
            .and_then(|id| self.library.get(id))
    }

    /// The collection ordered by the active sort mode.
    pub fn sorted_songs(&self) -> Vec<&Song> {
        library::sorted(self.library.songs(), self.state.sort)
    }

    /// Ids of the sorted view, the default working playlist.
    pub fn sorted_ids(&self) -> Vec<SongId> {
        self.sorted_songs().into_iter().map(|s| s.id.clone()).collect()
    }

    /// Ids of the sorted view narrowed by `filter`.
    pub fn visible_playlist(&self, filter: &PlaylistFilter) -> Vec<SongId> {
        filter
            .apply(self.sorted_songs(), &self.state.favorites)
            .into_iter()
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn is_favorite(&self, id: &SongId) -> bool {
        self.state.favorites.contains(id)
    }

    /// Song name while playing, the app title otherwise.
    pub fn document_title(&self) -> String {
        match self.current_song() {
            Some(song) if self.state.is_playing => song.name.clone(),
            _ => DEFAULT_TITLE.to_string(),
        }
    }

    // ========================================================================
    // Collection
    // ========================================================================

    /// Replace the collection with the audio entries of a folder pick.
    ///
    /// With no audio entries nothing changes and
    /// [`Error::NoAudioFilesFound`] is returned. Otherwise playback stops,
    /// the sink lets go of the old source, and the previous URLs are
    /// released before the new collection is built.
    pub fn load_collection(&mut self, entries: impl IntoIterator<Item = FileEntry>) -> Result<usize> {
        let audio = library::filter_audio(entries);
        if audio.is_empty() {
            warn!(target: "player::engine", "No audio files in selection");
            return Err(Error::NoAudioFilesFound);
        }

        self.stop_and_unload();
        let count = self.library.replace(audio);
        self.publish();
        Ok(count)
    }

    /// Stop playback and release the sink and every URL.
    ///
    /// Runs automatically on drop; calling it twice is harmless.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.stop_and_unload();
        self.library.clear();
        self.publish();
        self.shut_down = true;
        info!(target: "player::engine", "Engine shut down");
    }

    fn stop_and_unload(&mut self) {
        if self.loaded.take().is_some() {
            self.sink.pause();
            self.sink.unload();
        }
        self.state.current = None;
        self.state.is_playing = false;
        self.state.current_time = 0.0;
        self.state.duration = 0.0;
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Make `id` the current song and play it. Unknown ids are ignored.
    pub fn play_song(&mut self, id: &SongId) {
        if !self.library.contains(id) {
            debug!(target: "player::engine", %id, "play_song: unknown id ignored");
            return;
        }
        self.state.current = Some(id.clone());
        self.state.is_playing = true;
        self.sync_sink();
        self.publish();
    }

    /// Flip between playing and paused. No-op without a current song.
    pub fn toggle_play_pause(&mut self) {
        if self.current_song().is_none() {
            return;
        }
        self.state.is_playing = !self.state.is_playing;
        self.sync_sink();
        self.publish();
    }

    /// Advance within the sorted view.
    pub fn play_next(&mut self) {
        let playlist = self.sorted_ids();
        self.play_next_in(&playlist);
    }

    /// Advance within `playlist`. See [`navigation::next_target`].
    pub fn play_next_in(&mut self, playlist: &[SongId]) {
        let Some(current) = self.current_song().map(|s| s.id.clone()) else {
            return;
        };
        let step = navigation::next_target(
            playlist,
            &current,
            self.state.shuffle,
            self.state.repeat,
            &mut self.rng,
        );
        match step {
            Some(Step::Play(id)) => self.play_song(&id),
            Some(Step::Stop) => {
                info!(target: "player::engine", %current, "End of playlist, stopping");
                self.state.is_playing = false;
                self.sync_sink();
                self.publish();
            }
            None => {}
        }
    }

    /// Go back within the sorted view.
    pub fn play_prev(&mut self) {
        let playlist = self.sorted_ids();
        self.play_prev_in(&playlist);
    }

    /// Go back within `playlist`, wrapping at the start.
    pub fn play_prev_in(&mut self, playlist: &[SongId]) {
        let Some(current) = self.current_song().map(|s| s.id.clone()) else {
            return;
        };
        if let Some(id) = navigation::prev_target(playlist, &current) {
            self.play_song(&id);
        }
    }

    /// Move the playback position.
    ///
    /// `current_time` is updated right away rather than waiting for the
    /// sink's next time update.
    pub fn seek(&mut self, seconds: f64) {
        if self.current_song().is_none() {
            return;
        }
        let mut target = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        if self.state.duration > 0.0 {
            target = target.min(self.state.duration);
        }
        self.sink.seek(target);
        self.state.current_time = target;
    }

    /// Push the current song and play flag to the sink.
    fn sync_sink(&mut self) {
        let Some(song) = self.current_song() else {
            return;
        };
        let (url, source) = (song.url.clone(), song.source.clone());

        if self.loaded.as_ref() != Some(&url) {
            debug_assert!(self.library.urls().is_live(&url), "loading a revoked URL");
            debug!(target: "player::engine", %url, "Loading source");
            self.sink.load(&url, &source);
            self.loaded = Some(url);
            self.state.current_time = 0.0;
            self.state.duration = 0.0;
        }

        if self.state.is_playing {
            self.sink.play();
        } else {
            self.sink.pause();
        }
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    /// Add or remove `id` from the favorites and persist the set.
    pub fn toggle_favorite(&mut self, id: &SongId) {
        if !self.state.favorites.remove(id) {
            self.state.favorites.insert(id.clone());
        }
        schema::FAVORITES.write(&mut self.store, &self.state.favorites);
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
        schema::SHUFFLE.write(&mut self.store, &self.state.shuffle);
    }

    /// Cycle off → list → song → off.
    pub fn toggle_repeat(&mut self) {
        self.state.repeat = self.state.repeat.cycle();
        schema::REPEAT.write(&mut self.store, &self.state.repeat);
    }

    /// Cycle name-asc → name-desc → date-desc → date-asc → name-asc.
    pub fn toggle_sort(&mut self) {
        self.set_sort(self.state.sort.cycle());
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.state.sort = sort;
        schema::SORT.write(&mut self.store, &self.state.sort);
    }

    pub fn toggle_visualization(&mut self) {
        self.state.visualization = !self.state.visualization;
        schema::VISUALIZATION.write(&mut self.store, &self.state.visualization);
    }

    /// Set output volume, clamped to 0.0 - 1.0.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { self.state.volume };
        self.state.volume = volume;
        self.sink.set_volume(volume);
        schema::VOLUME.write(&mut self.store, &volume);
    }

    /// Set the accent hue, clamped to 0 - 360.
    pub fn set_hue(&mut self, hue: u16) {
        self.state.hue = hue.min(MAX_HUE);
        schema::HUE.write(&mut self.store, &self.state.hue);
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Fold a sink notification into the state.
    pub fn handle_sink_event(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::TimeUpdate(seconds) => {
                if seconds.is_finite() {
                    self.state.current_time = seconds;
                }
            }
            SinkEvent::MetadataLoaded { duration } => {
                self.state.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
            }
            SinkEvent::Ended => self.on_ended(),
            SinkEvent::Play => {
                self.state.is_playing = true;
                self.publish();
            }
            SinkEvent::Pause => {
                self.state.is_playing = false;
                self.publish();
            }
            SinkEvent::PlayRejected { url, reason } => {
                let is_current = self.current_song().is_some_and(|s| s.url == url);
                if is_current {
                    warn!(target: "player::engine", %url, %reason, "Playback rejected");
                    self.state.is_playing = false;
                    self.publish();
                } else {
                    debug!(target: "player::engine", %url, "Ignoring stale play rejection");
                }
            }
        }
    }

    fn on_ended(&mut self) {
        if self.state.repeat == RepeatMode::Song && self.current_song().is_some() {
            self.sink.seek(0.0);
            self.sink.play();
            self.state.current_time = 0.0;
            self.state.is_playing = true;
            self.publish();
        } else {
            self.play_next();
        }
    }

    /// Handle an OS media-session action.
    pub fn handle_media_action(&mut self, action: MediaAction) {
        debug!(target: "player::engine", ?action, "Media action");
        match action {
            MediaAction::Play if !self.state.is_playing => self.toggle_play_pause(),
            MediaAction::Pause if self.state.is_playing => self.toggle_play_pause(),
            MediaAction::Play | MediaAction::Pause => {}
            MediaAction::NextTrack => self.play_next(),
            MediaAction::PreviousTrack => self.play_prev(),
        }
    }

    /// Push metadata, playback flag and title to the session if they changed.
    fn publish(&mut self) {
        let song = self.current_song();
        let current = Published {
            song: song.map(|s| s.id.clone()),
            playing: song.is_some() && self.state.is_playing,
        };
        if self.published.as_ref() == Some(&current) {
            return;
        }

        let metadata = song.map(|s| NowPlaying::for_song(&s.name));
        let title = self.document_title();
        if let Some(session) = self.session.as_mut() {
            let playback = match (&metadata, current.playing) {
                (None, _) => SessionPlaybackState::None,
                (Some(_), true) => SessionPlaybackState::Playing,
                (Some(_), false) => SessionPlaybackState::Paused,
            };
            session.set_metadata(metadata.as_ref());
            session.set_playback_state(playback);
            session.set_document_title(&title);
        }
        self.published = Some(current);
    }
}

impl<S: MediaSink, P: PreferenceStore> Drop for PlaybackEngine<S, P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
