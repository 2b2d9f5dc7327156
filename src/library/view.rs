//! Derived views over the collection: the sorted view and the filtered
//! working playlist handed to navigation.

use icu_collator::{Collator, CollatorOptions, Strength};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::warn;

use crate::model::{Song, SongId, SortMode};

thread_local! {
    static NAME_ORDER: NameOrder = NameOrder::new();
}

/// Locale-aware name ordering (root locale).
///
/// Letters and accents decide first with case ignored. Case then breaks ties
/// with lowercase ahead of uppercase, and the raw string makes the order total.
struct NameOrder {
    folded: Option<Collator>,
    cased: Option<Collator>,
}

impl NameOrder {
    fn new() -> Self {
        Self {
            folded: collator(Strength::Secondary),
            cased: collator(Strength::Tertiary),
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (&self.folded, &self.cased) {
            (Some(folded), Some(cased)) => folded
                .compare(a, b)
                .then_with(|| cased.compare(a, b)),
            _ => a.to_lowercase().cmp(&b.to_lowercase()),
        }
        .then_with(|| a.cmp(b))
    }
}

fn collator(strength: Strength) -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(strength);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!(target: "library", error = %e, "Collator unavailable, sorting by lowercase code points");
            None
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    NAME_ORDER.with(|order| order.compare(a, b))
}

/// The songs ordered by `mode`. Pure function of its inputs.
pub fn sorted(songs: &[Song], mode: SortMode) -> Vec<&Song> {
    let mut view: Vec<&Song> = songs.iter().collect();
    match mode {
        SortMode::NameAsc => view.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortMode::NameDesc => view.sort_by(|a, b| compare_names(&b.name, &a.name)),
        SortMode::DateDesc => view.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        SortMode::DateAsc => view.sort_by(|a, b| a.date_added.cmp(&b.date_added)),
    }
    view
}

/// Narrows the sorted view to the songs the user is looking at.
#[derive(Debug, Clone, Default)]
pub struct PlaylistFilter {
    /// Only songs in the favorites set
    pub favorites_only: bool,
    /// Case-insensitive substring match on the song name
    pub query: Option<String>,
}

impl PlaylistFilter {
    pub fn favorites() -> Self {
        Self {
            favorites_only: true,
            query: None,
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            favorites_only: false,
            query: Some(query.into()),
        }
    }

    pub fn matches(&self, song: &Song, favorites: &BTreeSet<SongId>) -> bool {
        if self.favorites_only && !favorites.contains(&song.id) {
            return false;
        }
        match self.query.as_deref() {
            None | Some("") => true,
            Some(q) => song.name.to_lowercase().contains(&q.to_lowercase()),
        }
    }

    /// Apply the filter to an already sorted view.
    pub fn apply<'a>(&self, view: Vec<&'a Song>, favorites: &BTreeSet<SongId>) -> Vec<&'a Song> {
        view.into_iter()
            .filter(|song| self.matches(song, favorites))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::Library;
    use crate::test_utils::audio_entry;

    fn names(view: &[&Song]) -> Vec<String> {
        view.iter().map(|s| s.name.clone()).collect()
    }

    fn fruit_library() -> Library {
        let mut library = Library::new();
        library.replace(vec![
            audio_entry("banana.mp3", 1, 200),
            audio_entry("Apple.mp3", 2, 300),
            audio_entry("cherry.mp3", 3, 100),
        ]);
        library
    }

    #[test]
    fn test_name_asc_is_case_insensitive() {
        let library = fruit_library();
        let view = sorted(library.songs(), SortMode::NameAsc);
        assert_eq!(names(&view), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_name_asc_follows_collation_not_code_points() {
        let mut library = Library::new();
        library.replace(vec![
            audio_entry("zebra.mp3", 1, 0),
            audio_entry("Éclair.mp3", 2, 0),
            audio_entry("~intro.mp3", 3, 0),
            audio_entry("apple.mp3", 4, 0),
        ]);
        let view = sorted(library.songs(), SortMode::NameAsc);
        assert_eq!(names(&view), vec!["~intro", "apple", "Éclair", "zebra"]);
    }

    #[test]
    fn test_name_case_ties_put_lowercase_first() {
        assert_eq!(compare_names("apple", "Apple"), Ordering::Less);
        assert_eq!(compare_names("Apple", "banana"), Ordering::Less);
        assert_eq!(compare_names("apple", "apple"), Ordering::Equal);
    }

    #[test]
    fn test_name_desc() {
        let library = fruit_library();
        let view = sorted(library.songs(), SortMode::NameDesc);
        assert_eq!(names(&view), vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_date_orders() {
        let library = fruit_library();
        let newest_first = sorted(library.songs(), SortMode::DateDesc);
        assert_eq!(names(&newest_first), vec!["Apple", "banana", "cherry"]);
        let oldest_first = sorted(library.songs(), SortMode::DateAsc);
        assert_eq!(names(&oldest_first), vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_filter_search_and_favorites() {
        let library = fruit_library();
        let mut favorites = BTreeSet::new();
        favorites.insert(SongId::for_file("cherry.mp3", 3));
        favorites.insert(SongId::for_file("banana.mp3", 1));

        let view = sorted(library.songs(), SortMode::NameAsc);
        let search = PlaylistFilter::search("AN");
        assert_eq!(names(&search.apply(view.clone(), &favorites)), vec!["banana"]);

        let favs = PlaylistFilter::favorites();
        assert_eq!(
            names(&favs.apply(view.clone(), &favorites)),
            vec!["banana", "cherry"]
        );

        let both = PlaylistFilter {
            favorites_only: true,
            query: Some("ch".into()),
        };
        assert_eq!(names(&both.apply(view, &favorites)), vec!["cherry"]);
    }
}
