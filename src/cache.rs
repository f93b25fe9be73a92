//! Path classification caching.
//!
//! This module provides [`PropertiesCache`]: an LRU cache that remembers
//! which rule of a [`PathConfiguration`](crate::PathConfiguration) matched a
//! given location path, so repeated proposals for the same screen skip the
//! regex scan. It is gated behind the `cache` feature flag and uses the
//! [`lru`] crate internally.
//!
//! A cached entry is the *index* of the matching rule (or `None` when no
//! rule matched), never a copy of the properties; the configuration itself is
//! immutable, so an index stays valid for the lifetime of the configuration
//! the cache was filled from. Call [`PropertiesCache::clear`] when swapping
//! configurations.
//!
//! # Examples
//!
//! ```
//! use hybrid_navigator::cache::PropertiesCache;
//!
//! let mut cache = PropertiesCache::new();
//! cache.insert("/posts/new".to_string(), Some(3));
//!
//! assert_eq!(cache.get("/posts/new"), Some(Some(3)));
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that required a rule scan.
    pub misses: usize,
    /// Number of full cache invalidations (via [`PropertiesCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache from location path to matched rule index.
#[derive(Debug)]
pub struct PropertiesCache {
    entries: LruCache<String, Option<usize>>,
    stats: CacheStats,
}

impl PropertiesCache {
    const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity (256 paths).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).expect("Cache capacity must be non-zero");
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up the cached rule index for `path`.
    ///
    /// Returns `None` on a miss, `Some(None)` for a cached "no rule matched".
    pub fn get(&mut self, path: &str) -> Option<Option<usize>> {
        if let Some(index) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Path configuration cache hit for '{}'", path);
            Some(*index)
        } else {
            self.stats.misses += 1;
            trace_log!("Path configuration cache miss for '{}'", path);
            None
        }
    }

    /// Remember the rule index that matched `path`.
    pub fn insert(&mut self, path: String, rule_index: Option<usize>) {
        self.entries.push(path, rule_index);
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Path configuration cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Return the number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PropertiesCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_miss_then_hit() {
        let mut cache = PropertiesCache::new();
        assert_eq!(cache.get("/posts"), None);
        assert_eq!(cache.stats().misses, 1);

        cache.insert("/posts".to_string(), None);
        assert_eq!(cache.get("/posts"), Some(None));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_cache_eviction() {
        let mut cache = PropertiesCache::with_capacity(2);
        cache.insert("/a".to_string(), Some(0));
        cache.insert("/b".to_string(), Some(1));
        cache.get("/a");
        cache.insert("/c".to_string(), Some(2));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("/b"), None);
        assert_eq!(cache.get("/a"), Some(Some(0)));
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = PropertiesCache::new();
        cache.insert("/a".to_string(), Some(0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_hit_rate_calculation() {
        let mut cache = PropertiesCache::new();
        cache.get("/a");
        cache.get("/b");
        cache.get("/c");
        cache.insert("/a".to_string(), Some(0));
        cache.insert("/b".to_string(), None);
        cache.get("/a");
        cache.get("/b");

        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 3);
        assert!((cache.stats().hit_rate() - 0.4).abs() < 0.001);
    }
}
