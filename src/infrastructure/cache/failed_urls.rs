//! Bounded LRU set of image URLs whose last fetch failed.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

/// Default maximum number of remembered failures.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Shared denylist consulted before each non-manga fetch.
/// Thread-safe; `contains` does not refresh an entry's recency.
pub struct FailedUrlCache {
    urls: Mutex<LruCache<String, ()>>,
    skips: AtomicU64,
}

impl FailedUrlCache {
    /// Creates a denylist holding at most `capacity` URLs.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            urls: Mutex::new(LruCache::new(cap)),
            skips: AtomicU64::new(0),
        }
    }

    /// Creates a denylist with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Returns true if `url` previously failed.
    pub fn contains(&self, url: &str) -> bool {
        let hit = self.urls.lock().contains(url);
        if hit {
            self.skips.fetch_add(1, Ordering::Relaxed);
            trace!(url = %url, "Failed URL hit");
        }
        hit
    }

    /// Records a failed URL, evicting the oldest entry when full.
    pub fn insert(&self, url: impl Into<String>) {
        let url = url.into();
        debug!(url = %url, "Recording failed image URL");
        self.urls.lock().put(url, ());
    }

    /// Forgets a URL so it can be fetched again.
    pub fn remove(&self, url: &str) -> bool {
        self.urls.lock().pop(url).is_some()
    }

    /// Number of remembered URLs.
    pub fn len(&self) -> usize {
        self.urls.lock().len()
    }

    /// Returns true if nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `contains` checks that matched.
    pub fn skip_count(&self) -> u64 {
        self.skips.load(Ordering::Relaxed)
    }

    /// Forgets every URL.
    pub fn clear(&self) {
        self.urls.lock().clear();
        debug!("Cleared failed image URLs");
    }
}

impl Default for FailedUrlCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl std::fmt::Debug for FailedUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailedUrlCache")
            .field("len", &self.len())
            .field("skips", &self.skip_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let cache = FailedUrlCache::new(10);
        cache.insert("https://a/1.jpg");

        assert!(cache.contains("https://a/1.jpg"));
        assert!(!cache.contains("https://a/2.jpg"));
        assert_eq!(cache.skip_count(), 1);
    }

    #[test]
    fn test_eviction() {
        let cache = FailedUrlCache::new(2);
        cache.insert("1");
        cache.insert("2");
        cache.insert("3");

        // "1" is the least recently inserted
        assert!(!cache.contains("1"));
        assert!(cache.contains("2"));
        assert!(cache.contains("3"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_contains_does_not_promote() {
        let cache = FailedUrlCache::new(2);
        cache.insert("1");
        cache.insert("2");

        let _ = cache.contains("1");
        cache.insert("3");

        assert!(!cache.contains("1"));
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = FailedUrlCache::new(4);
        cache.insert("1");
        cache.insert("2");

        assert!(cache.remove("1"));
        assert!(!cache.remove("1"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let cache = FailedUrlCache::new(0);
        cache.insert("1");
        assert_eq!(cache.len(), 1);
    }
}
