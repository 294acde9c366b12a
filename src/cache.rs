//! Client-side cache of fetched result sets

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::{QueryKey, ResultSet};

struct CacheEntry {
    set: Arc<ResultSet>,
    fetched_at: Instant,
}

/// Result sets keyed by query. Entries are replaced wholesale, never edited.
///
/// The epoch advances on every [`QueryCache::reset`]; results requested
/// under an earlier epoch are refused.
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    ttl: Duration,
    epoch: u64,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            epoch: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    /// Cached set for `key` if it is younger than the TTL at `now`
    pub fn get_fresh(&self, key: &QueryKey, now: Instant) -> Option<Arc<ResultSet>> {
        self.entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.fetched_at) < self.ttl)
            .map(|entry| Arc::clone(&entry.set))
    }

    pub fn insert(&mut self, key: QueryKey, set: Arc<ResultSet>, now: Instant) {
        self.entries.insert(key, CacheEntry { set, fetched_at: now });
    }

    /// Insert a result requested under `epoch`. Returns false (and stores
    /// nothing) when the cache has been reset since.
    pub fn insert_from(&mut self, epoch: u64, key: QueryKey, set: Arc<ResultSet>, now: Instant) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.insert(key, set, now);
        true
    }

    pub fn invalidate(&mut self, key: &QueryKey) {
        self.entries.remove(key);
    }

    /// Drop everything older than the TTL
    pub fn evict_stale(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < ttl);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop everything and start a new epoch (source settings changed)
    pub fn reset(&mut self) {
        self.clear();
        self.epoch += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_set, Category};

    #[test]
    fn test_fresh_hit_and_expiry() {
        let start = Instant::now();
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryKey::list(Category::MoviePopular);
        cache.insert(key.clone(), Arc::new(sample_set(3)), start);

        assert_eq!(cache.get_fresh(&key, start + Duration::from_secs(59)).unwrap().len(), 3);
        assert!(cache.get_fresh(&key, start + Duration::from_secs(60)).is_none());
    }

    #[test]
    fn test_keyword_is_part_of_key() {
        let now = Instant::now();
        let mut cache = QueryCache::new(Duration::from_secs(60));
        cache.insert(
            QueryKey::search(Category::MovieSearch, Some("dune")),
            Arc::new(sample_set(2)),
            now,
        );
        assert!(cache
            .get_fresh(&QueryKey::search(Category::MovieSearch, Some("alien")), now)
            .is_none());
        assert!(cache
            .get_fresh(&QueryKey::search(Category::TvSearch, Some("dune")), now)
            .is_none());
    }

    #[test]
    fn test_refetch_replaces_entry() {
        let now = Instant::now();
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryKey::list(Category::TvPopular);
        let old = Arc::new(sample_set(2));
        cache.insert(key.clone(), Arc::clone(&old), now);
        cache.insert(key.clone(), Arc::new(sample_set(5)), now);

        assert_eq!(cache.get_fresh(&key, now).unwrap().len(), 5);
        assert_eq!(old.len(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evict_and_invalidate() {
        let start = Instant::now();
        let mut cache = QueryCache::new(Duration::from_secs(10));
        cache.insert(QueryKey::list(Category::TvOnTheAir), Arc::new(sample_set(1)), start);
        cache.insert(
            QueryKey::list(Category::TvTopRated),
            Arc::new(sample_set(1)),
            start + Duration::from_secs(8),
        );

        cache.evict_stale(start + Duration::from_secs(12));
        assert_eq!(cache.len(), 1);

        cache.invalidate(&QueryKey::list(Category::TvTopRated));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_results_from_before_reset_are_refused() {
        let now = Instant::now();
        let mut cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryKey::list(Category::MoviePopular);
        let old_epoch = cache.epoch();
        cache.insert(key.clone(), Arc::new(sample_set(3)), now);

        cache.reset();
        assert!(cache.is_empty());
        assert_ne!(cache.epoch(), old_epoch);

        assert!(!cache.insert_from(old_epoch, key.clone(), Arc::new(sample_set(4)), now));
        assert!(cache.get_fresh(&key, now).is_none());

        assert!(cache.insert_from(cache.epoch(), key.clone(), Arc::new(sample_set(5)), now));
        assert_eq!(cache.get_fresh(&key, now).unwrap().len(), 5);
    }
}
