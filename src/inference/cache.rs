//! Recommendation caching: reuse results for repeated `(query, n, mode)` requests.

use super::assemble::{OutputMode, Recommendation};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Default number of cached requests.
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// Cache key. The query is kept verbatim, so `"맛 "` and `"맛"` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub num_results: usize,
    pub mode: OutputMode,
}

impl CacheKey {
    pub fn new(query: impl Into<String>, num_results: usize, mode: OutputMode) -> Self {
        Self {
            query: query.into(),
            num_results,
            mode,
        }
    }
}

/// Bounded LRU of finished recommendation lists. Safe to share between threads.
pub struct RecommendationCache {
    entries: Mutex<LruCache<CacheKey, Arc<[Recommendation]>>>,
    capacity: NonZeroUsize,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl RecommendationCache {
    /// `capacity` of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, Arc<[Recommendation]>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached result for `key`, or run `compute` and store its result.
    ///
    /// `compute` runs without holding the lock, so two concurrent misses on the
    /// same key may both compute; the results are identical. Errors are
    /// returned to the caller and never stored.
    pub fn get_or_compute<E, F>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<Arc<[Recommendation]>, E>
    where
        F: FnOnce() -> Result<Vec<Recommendation>, E>,
    {
        if let Some(hit) = self.lock().get(&key).cloned() {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            debug!(query = %key.query, n = key.num_results, mode = %key.mode, "cache hit");
            return Ok(hit);
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        debug!(query = %key.query, n = key.num_results, mode = %key.mode, "cache miss");
        let value: Arc<[Recommendation]> = compute()?.into();
        self.lock().put(key, Arc::clone(&value));
        Ok(value)
    }

    pub fn hits(&self) -> u64 {
        self.hit_count.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.miss_count.load(Ordering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
