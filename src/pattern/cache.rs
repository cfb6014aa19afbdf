//! LRU cache of occurrence sets keyed by pattern
//!
//! One cache lives alongside each suffix array and is shared by every prefix
//! tree built against it, including trees built concurrently on other
//! threads. Capacity zero disables caching.
//!
//! Gap-free sets depend only on the corpus. Sets of patterns with gaps also
//! depend on the span limits they were merged under, so they are keyed by
//! pattern and [`SpanLimits`] together.

use super::pattern::Pattern;
use super::phrases::HierarchicalPhraseSet;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Default number of cached patterns
pub const DEFAULT_CACHE_CAPACITY: usize = 100_000;

/// Limits that shape the occurrence set of a pattern with gaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanLimits {
    pub max_phrase_span: usize,
    pub min_nonterminal_span: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    pattern: Pattern,
    limits: Option<SpanLimits>,
}

impl CacheKey {
    fn new(pattern: Pattern, limits: Option<SpanLimits>) -> Self {
        let limits = if pattern.arity() == 0 { None } else { limits };
        Self { pattern, limits }
    }
}

type Entries = LruCache<CacheKey, Arc<HierarchicalPhraseSet>>;

/// Bounded least-recently-used map from pattern to its occurrences
pub struct PatternCache {
    entries: Option<Mutex<Entries>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub capacity: usize,
    pub len: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, Entries>> {
        // Entries are immutable values; a poisoned lock is still usable.
        self.entries
            .as_ref()
            .map(|m| m.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    /// Look up a gap-free pattern, marking it most recently used
    pub fn get(&self, pattern: &Pattern) -> Option<Arc<HierarchicalPhraseSet>> {
        self.lookup(CacheKey::new(pattern.clone(), None))
    }

    /// Look up a pattern merged under `limits`, marking it most recently used
    pub fn get_within(&self, pattern: &Pattern, limits: SpanLimits) -> Option<Arc<HierarchicalPhraseSet>> {
        self.lookup(CacheKey::new(pattern.clone(), Some(limits)))
    }

    fn lookup(&self, key: CacheKey) -> Option<Arc<HierarchicalPhraseSet>> {
        let found = self.lock().and_then(|mut entries| entries.get(&key).cloned());
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Check for a gap-free pattern without touching its recency
    pub fn contains(&self, pattern: &Pattern) -> bool {
        let key = CacheKey::new(pattern.clone(), None);
        self.lock().is_some_and(|entries| entries.contains(&key))
    }

    /// Insert the occurrence set of a gap-free pattern under its own pattern
    ///
    /// Returns the pattern evicted to make room, if any.
    pub fn insert(&self, phrases: Arc<HierarchicalPhraseSet>) -> Option<Pattern> {
        let key = CacheKey::new(phrases.pattern().clone(), None);
        self.store(key, phrases)
    }

    /// Insert an occurrence set merged under `limits`
    pub fn insert_within(&self, phrases: Arc<HierarchicalPhraseSet>, limits: SpanLimits) -> Option<Pattern> {
        let key = CacheKey::new(phrases.pattern().clone(), Some(limits));
        self.store(key, phrases)
    }

    fn store(&self, key: CacheKey, phrases: Arc<HierarchicalPhraseSet>) -> Option<Pattern> {
        let mut entries = self.lock()?;
        match entries.push(key.clone(), phrases) {
            Some((evicted, _)) if evicted != key => Some(evicted.pattern),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        if let Some(mut entries) = self.lock() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            capacity: self.capacity,
            len: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::X;

    fn entry(token: i32) -> Arc<HierarchicalPhraseSet> {
        Arc::new(HierarchicalPhraseSet::empty(Pattern::new(vec![token])))
    }

    fn key(token: i32) -> Pattern {
        Pattern::new(vec![token])
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = PatternCache::new(3);
        for t in 0..3 {
            assert_eq!(cache.insert(entry(t)), None);
        }
        assert_eq!(cache.insert(entry(3)), Some(key(0)));
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&key(0)));
        assert!(cache.contains(&key(1)));
    }

    #[test]
    fn test_get_refreshes_recency() {
        let cache = PatternCache::new(3);
        for t in 0..3 {
            cache.insert(entry(t));
        }
        assert!(cache.get(&key(0)).is_some());
        assert_eq!(cache.insert(entry(3)), Some(key(1)));
        assert!(cache.contains(&key(0)));
    }

    #[test]
    fn test_contains_does_not_refresh() {
        let cache = PatternCache::new(2);
        cache.insert(entry(0));
        cache.insert(entry(1));
        assert!(cache.contains(&key(0)));
        assert_eq!(cache.insert(entry(2)), Some(key(0)));
    }

    #[test]
    fn test_reinsert_same_key() {
        let cache = PatternCache::new(2);
        cache.insert(entry(0));
        cache.insert(entry(1));
        assert_eq!(cache.insert(entry(1)), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_stats() {
        let cache = PatternCache::new(4);
        cache.insert(entry(7));
        cache.get(&key(7));
        cache.get(&key(7));
        cache.get(&key(8));

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_capacity_disables() {
        let cache = PatternCache::new(0);
        assert_eq!(cache.insert(entry(1)), None);
        assert!(cache.get(&key(1)).is_none());
        assert!(cache.is_empty());
    }

    const NARROW: SpanLimits = SpanLimits {
        max_phrase_span: 3,
        min_nonterminal_span: 2,
    };
    const WIDE: SpanLimits = SpanLimits {
        max_phrase_span: 10,
        min_nonterminal_span: 2,
    };

    #[test]
    fn test_gapped_sets_keyed_by_limits() {
        let cache = PatternCache::new(4);
        let gapped = Arc::new(HierarchicalPhraseSet::empty(Pattern::new(vec![0, X, 1])));
        cache.insert_within(Arc::clone(&gapped), NARROW);

        assert!(cache.get_within(gapped.pattern(), NARROW).is_some());
        assert!(cache.get_within(gapped.pattern(), WIDE).is_none());
        assert!(cache.get(gapped.pattern()).is_none());
    }

    #[test]
    fn test_gap_free_sets_ignore_limits() {
        let cache = PatternCache::new(4);
        cache.insert_within(entry(5), NARROW);
        assert!(cache.get(&key(5)).is_some());
        assert!(cache.get_within(&key(5), WIDE).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = PatternCache::new(4);
        cache.insert(entry(1));
        cache.clear();
        assert!(cache.is_empty());
    }
}
