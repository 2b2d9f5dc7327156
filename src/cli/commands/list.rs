//! Folder listing command.

use std::path::Path;
use tokio::runtime::Runtime;

use crate::library::PlaylistFilter;
use crate::model::{PlayableUrl, SourceHandle};
use crate::player::{MediaSink, PlaybackEngine};
use crate::prefs::PreferenceStore;
use crate::scanner;

/// Sink for runs that never play anything.
struct SilentSink;

impl MediaSink for SilentSink {
    fn load(&mut self, _url: &PlayableUrl, _source: &SourceHandle) {}
    fn unload(&mut self) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn seek(&mut self, _seconds: f64) {}
    fn set_volume(&mut self, _volume: f32) {}
}

/// Print the sorted, filtered playlist for a folder.
pub fn cmd_list(
    rt: &Runtime,
    store: Box<dyn PreferenceStore>,
    path: &Path,
    favorites_only: bool,
    search: Option<&str>,
) -> anyhow::Result<()> {
    if !path.is_dir() {
        return Err(crate::error::Error::not_found(path).into());
    }
    let entries = rt.block_on(scanner::collect(path.to_path_buf()));

    let mut engine = PlaybackEngine::new(SilentSink, store);
    let count = engine.load_collection(entries)?;

    let filter = PlaylistFilter {
        favorites_only,
        query: search.map(str::to_string),
    };
    for line in render(&engine, &filter, count) {
        println!("{}", line);
    }
    Ok(())
}

/// Header plus one line per visible song, favorites marked with `*`.
fn render<P: PreferenceStore>(
    engine: &PlaybackEngine<SilentSink, P>,
    filter: &PlaylistFilter,
    count: usize,
) -> Vec<String> {
    let state = engine.state();
    let visible = filter.apply(engine.sorted_songs(), &state.favorites);

    let mut lines = vec![format!(
        "{} of {} songs (sort: {}, shuffle: {}, repeat: {})",
        visible.len(),
        count,
        state.sort,
        if state.shuffle { "on" } else { "off" },
        state.repeat,
    )];
    for (i, song) in visible.iter().enumerate() {
        let marker = if engine.is_favorite(&song.id) { '*' } else { ' ' };
        lines.push(format!("{} {:>4}. {}", marker, i + 1, song.name));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryStore;
    use crate::test_utils::audio_entry;

    #[test]
    fn test_render_marks_favorites_and_filters() {
        let store = MemoryStore::with_values([("musebox-favorites", r#"["b.mp3-2"]"#)]);
        let mut engine = PlaybackEngine::with_seed(SilentSink, store, 3);
        let count = engine
            .load_collection(vec![
                audio_entry("c.mp3", 3, 0),
                audio_entry("a.mp3", 1, 0),
                audio_entry("b.mp3", 2, 0),
            ])
            .unwrap();

        let all = render(&engine, &PlaylistFilter::default(), count);
        assert_eq!(all[0], "3 of 3 songs (sort: name-asc, shuffle: off, repeat: none)");
        assert_eq!(&all[1..], ["     1. a", "*    2. b", "     3. c"]);

        let favs = render(&engine, &PlaylistFilter::favorites(), count);
        assert_eq!(favs.len(), 2);
        assert_eq!(favs[1], "*    1. b");
    }
}
