//! Folder input: turns a directory into a stream of [`FileEntry`] values.
//!
//! Every regular file is yielded, audio or not. The media type is guessed
//! from the extension and the library decides what to keep.

use chrono::{DateTime, Utc};
use futures::stream::Stream;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::model::{FileEntry, SourceHandle};

/// Guess a media type from the file extension (case-insensitive).
///
/// Unknown extensions yield `application/octet-stream`.
pub fn media_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Build an entry for one file from its metadata.
fn entry_for(path: &Path) -> std::io::Result<FileEntry> {
    let metadata = std::fs::metadata(path)?;
    let last_modified = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(FileEntry {
        name,
        size: metadata.len(),
        last_modified,
        media_type: media_type_for(path),
        source: SourceHandle::new(path),
    })
}

/// Scans the given root directory recursively.
///
/// Returns a Stream of entries for every regular file found.
pub fn scan(root: PathBuf) -> impl Stream<Item = FileEntry> {
    let (tx, rx) = mpsc::channel(100);

    // Walk on a blocking thread; the receiver side is the stream
    tokio::task::spawn_blocking(move || {
        debug!(target: "scanner", root = %root.display(), "Scanning folder");
        for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            match entry_for(entry.path()) {
                Ok(file) => {
                    // Receiver dropped: stop scanning
                    if tx.blocking_send(file).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(target: "scanner", path = %entry.path().display(), error = %e, "Skipping unreadable file");
                }
            }
        }
    });

    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|entry| (entry, rx))
    })
}

/// Collect the whole folder into a vector.
pub async fn collect(root: PathBuf) -> Vec<FileEntry> {
    use futures::StreamExt;
    scan(root).collect().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_scan_yields_entries_with_media_types() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        let mut song = File::create(root.join("song.mp3")).unwrap();
        song.write_all(b"1234567").unwrap();
        File::create(root.join("music.flac")).unwrap();
        File::create(root.join("notes.txt")).unwrap();
        File::create(root.join("UPPERCASE.OGG")).unwrap();

        let subdir = root.join("subdir");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("track.wav")).unwrap();

        let entries: Vec<FileEntry> = scan(root.to_path_buf()).collect().await;
        assert_eq!(entries.len(), 5);

        let find = |name: &str| entries.iter().find(|e| e.name == name).unwrap();
        assert_eq!(find("song.mp3").size, 7);
        assert_eq!(find("song.mp3").media_type, "audio/mpeg");
        assert!(find("UPPERCASE.OGG").is_audio());
        assert!(find("track.wav").is_audio());
        assert_eq!(find("track.wav").source.path(), subdir.join("track.wav"));
        assert!(!find("notes.txt").is_audio());
        assert!(find("music.flac").is_audio());
    }

    #[tokio::test]
    async fn test_scan_empty_folder() {
        let dir = tempdir().unwrap();
        let entries = collect(dir.path().to_path_buf()).await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_scan_recognizes_less_common_audio_formats() {
        let dir = tempdir().unwrap();
        for name in ["a.aiff", "b.aif", "c.wma", "d.mid", "e.m4a"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let entries = collect(dir.path().to_path_buf()).await;
        assert_eq!(entries.len(), 5);
        for entry in &entries {
            assert!(entry.is_audio(), "{} -> {}", entry.name, entry.media_type);
        }

        let mut engine = crate::player::PlaybackEngine::with_seed(
            crate::test_utils::RecordingSink::default(),
            crate::prefs::MemoryStore::new(),
            1,
        );
        assert_eq!(engine.load_collection(entries).unwrap(), 5);
    }

    #[test]
    fn test_media_type_for_known_and_unknown_extensions() {
        assert_eq!(media_type_for(Path::new("song.MP3")), "audio/mpeg");
        assert_eq!(media_type_for(Path::new("notes.txt")), "text/plain");
        assert_eq!(media_type_for(Path::new("noext")), "application/octet-stream");
    }
}
