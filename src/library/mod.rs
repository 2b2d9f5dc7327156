//! The song collection.
//!
//! The collection is replaced wholesale whenever a new folder is loaded;
//! there is no incremental merge. It owns the playable URLs of its songs
//! and releases them on replacement or teardown.

mod urls;
mod view;

pub use urls::UrlRegistry;
pub use view::{PlaylistFilter, sorted};

use std::collections::HashMap;
use tracing::{debug, info};

use crate::model::{FileEntry, Song, SongId, display_name};

/// Keep only entries whose media type indicates audio.
pub fn filter_audio(entries: impl IntoIterator<Item = FileEntry>) -> Vec<FileEntry> {
    entries.into_iter().filter(FileEntry::is_audio).collect()
}

/// The active set of songs.
#[derive(Debug, Default)]
pub struct Library {
    songs: Vec<Song>,
    index: HashMap<SongId, usize>,
    urls: UrlRegistry,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with songs built from `entries`.
    ///
    /// Every previously issued URL is revoked first. Entries sharing an id
    /// (same name and size) keep the first occurrence. Returns the number
    /// of songs in the new collection.
    pub fn replace(&mut self, entries: impl IntoIterator<Item = FileEntry>) -> usize {
        self.clear();

        for entry in entries {
            let id = SongId::for_file(&entry.name, entry.size);
            if self.index.contains_key(&id) {
                debug!(target: "library", %id, "Skipping duplicate entry");
                continue;
            }
            let url = self.urls.create(&entry.source);
            self.index.insert(id.clone(), self.songs.len());
            self.songs.push(Song {
                id,
                name: display_name(&entry.name),
                source: entry.source,
                url,
                date_added: entry.last_modified,
            });
        }

        info!(
            target: "library",
            songs = self.songs.len(),
            live_urls = self.urls.live_count(),
            revoked_urls = self.urls.revoked_count(),
            "Collection replaced"
        );
        self.songs.len()
    }

    /// Drop every song and release its URL.
    pub fn clear(&mut self) {
        for song in self.songs.drain(..) {
            self.urls.revoke(&song.url);
        }
        self.index.clear();
    }

    pub fn get(&self, id: &SongId) -> Option<&Song> {
        self.index.get(id).and_then(|&i| self.songs.get(i))
    }

    pub fn contains(&self, id: &SongId) -> bool {
        self.index.contains_key(id)
    }

    /// Songs in load order.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn urls(&self) -> &UrlRegistry {
        &self.urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{audio_entry, entry_with_type};

    #[test]
    fn test_filter_audio_drops_other_types() {
        let entries = vec![
            audio_entry("a.mp3", 10, 0),
            entry_with_type("cover.jpg", "image/jpeg"),
            entry_with_type("notes.txt", "text/plain"),
            audio_entry("b.flac", 20, 0),
        ];
        let audio = filter_audio(entries);
        assert_eq!(audio.len(), 2);
    }

    #[test]
    fn test_replace_builds_songs() {
        let mut library = Library::new();
        let count = library.replace(vec![audio_entry("First Song.mp3", 100, 5)]);
        assert_eq!(count, 1);

        let song = &library.songs()[0];
        assert_eq!(song.id.as_str(), "First Song.mp3-100");
        assert_eq!(song.name, "First Song");
        assert!(library.urls().is_live(&song.url));
        assert!(library.contains(&song.id));
    }

    #[test]
    fn test_replace_revokes_previous_urls() {
        let mut library = Library::new();
        library.replace(vec![audio_entry("a.mp3", 1, 0), audio_entry("b.mp3", 2, 0)]);
        let old_urls: Vec<_> = library.songs().iter().map(|s| s.url.clone()).collect();

        library.replace(vec![audio_entry("c.mp3", 3, 0)]);

        for url in &old_urls {
            assert!(!library.urls().is_live(url));
        }
        assert_eq!(library.urls().revoked_count(), 2);
        assert_eq!(library.urls().live_count(), 1);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut library = Library::new();
        let count = library.replace(vec![audio_entry("a.mp3", 1, 0), audio_entry("a.mp3", 1, 9)]);
        assert_eq!(count, 1);
        assert_eq!(library.urls().live_count(), 1);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut library = Library::new();
        library.replace(vec![audio_entry("a.mp3", 1, 0)]);
        library.clear();
        assert!(library.is_empty());
        assert_eq!(library.urls().live_count(), 0);
    }
}
