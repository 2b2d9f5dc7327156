//! Playable-URL registry.
//!
//! Every song in the collection owns exactly one URL. A URL is issued when
//! the song is registered and revoked exactly once, when the collection is
//! replaced or torn down.

use std::collections::HashSet;

use crate::model::{PlayableUrl, SourceHandle};

/// Issues and releases [`PlayableUrl`]s.
#[derive(Debug, Default)]
pub struct UrlRegistry {
    next_id: u64,
    live: HashSet<PlayableUrl>,
    revoked: u64,
}

impl UrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh URL for a source.
    pub fn create(&mut self, source: &SourceHandle) -> PlayableUrl {
        self.next_id += 1;
        let url = PlayableUrl::new(format!("blob:musebox/{}", self.next_id));
        tracing::trace!(target: "library::urls", %url, source = %source.path().display(), "Issued URL");
        self.live.insert(url.clone());
        url
    }

    /// Release a URL. Returns `false` if it was not live.
    pub fn revoke(&mut self, url: &PlayableUrl) -> bool {
        if self.live.remove(url) {
            self.revoked += 1;
            true
        } else {
            tracing::warn!(target: "library::urls", %url, "Revoke of a URL that is not live");
            false
        }
    }

    pub fn is_live(&self, url: &PlayableUrl) -> bool {
        self.live.contains(url)
    }

    /// Number of URLs issued and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total number of revocations performed.
    pub fn revoked_count(&self) -> u64 {
        self.revoked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_issues_unique_urls() {
        let mut urls = UrlRegistry::new();
        let source = SourceHandle::new("/music/a.mp3");
        let a = urls.create(&source);
        let b = urls.create(&source);
        assert_ne!(a, b);
        assert_eq!(urls.live_count(), 2);
        assert!(urls.is_live(&a) && urls.is_live(&b));
    }

    #[test]
    fn test_revoke_only_once() {
        let mut urls = UrlRegistry::new();
        let url = urls.create(&SourceHandle::new("/music/a.mp3"));
        assert!(urls.revoke(&url));
        assert!(!urls.revoke(&url));
        assert_eq!(urls.revoked_count(), 1);
        assert!(!urls.is_live(&url));
    }
}
