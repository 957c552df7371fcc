//! Fixed-capacity LRU caches for geocoding results.
//!
//! One cache per lookup direction. Values are the ordered result list of a
//! successful, non-empty lookup and are never mutated after insert.

use crate::types::GeocodedLocation;
use lru::LruCache;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of entries per direction.
pub const DEFAULT_CAPACITY: usize = 32;

/// Key for the name direction: the query trimmed and lower-cased.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(query: &str) -> Self {
        Self(query.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Key for the coordinate direction. Compared bit-exactly, with `-0.0`
/// folded onto `0.0` so both zeros hit the same entry.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct CoordKey {
    lat_bits: u64,
    lon_bits: u64,
}

impl CoordKey {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_bits: canonical_bits(latitude),
            lon_bits: canonical_bits(longitude),
        }
    }

    pub fn latitude(&self) -> f64 {
        f64::from_bits(self.lat_bits)
    }

    pub fn longitude(&self) -> f64 {
        f64::from_bits(self.lon_bits)
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

/// Hit/miss counters for one cache.
#[derive(Debug, Default)]
pub struct CacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

/// Thread-safe LRU map from a lookup key to its ordered results.
///
/// Every method takes the lock for the duration of a single map operation,
/// so callers can never hold it across an await.
#[derive(Debug)]
pub struct LookupCache<K: Hash + Eq> {
    entries: Mutex<LruCache<K, Vec<GeocodedLocation>>>,
    stats: CacheStats,
}

impl<K: Hash + Eq + Clone + Debug> LookupCache<K> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: CacheStats::default(),
        }
    }

    /// Capacity from a plain count; zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN))
    }

    /// Look up and mark as most recently used.
    pub fn get(&self, key: &K) -> Option<Vec<GeocodedLocation>> {
        let hit = self.entries.lock().get(key).cloned();
        let counter = if hit.is_some() {
            &self.stats.hits
        } else {
            &self.stats.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        hit
    }

    /// Insert a result list. Empty lists are not stored.
    pub fn insert(&self, key: K, results: Vec<GeocodedLocation>) {
        if results.is_empty() {
            return;
        }
        let evicted = self.entries.lock().push(key.clone(), results);
        if let Some((old_key, _)) = evicted {
            if old_key != key {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Evicted least recently used entry {:?}", old_key);
            }
        }
    }

    /// Presence check that does not touch recency.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str) -> GeocodedLocation {
        GeocodedLocation {
            latitude: 1.0,
            longitude: 2.0,
            name: name.to_string(),
            country: "US".to_string(),
            state: None,
        }
    }

    #[test]
    fn test_name_key_normalizes() {
        assert_eq!(NameKey::new("  Jersey City,NJ,US "), NameKey::new("jersey city,nj,us"));
        assert_ne!(NameKey::new("ny"), NameKey::new("nyc"));
    }

    #[test]
    fn test_coord_key_folds_negative_zero() {
        assert_eq!(CoordKey::new(-0.0, 0.0), CoordKey::new(0.0, -0.0));
        assert_ne!(CoordKey::new(40.7225, -74.0422), CoordKey::new(40.7225, -74.0421));
        assert_eq!(CoordKey::new(40.7225, -74.0422).latitude(), 40.7225);
    }

    #[test]
    fn test_insert_past_capacity_evicts_lru() {
        let cache = LookupCache::with_capacity(2);
        cache.insert(NameKey::new("a"), vec![place("a")]);
        cache.insert(NameKey::new("b"), vec![place("b")]);
        cache.insert(NameKey::new("c"), vec![place("c")]);

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&NameKey::new("a")));
        assert!(cache.contains(&NameKey::new("b")));
        assert!(cache.contains(&NameKey::new("c")));
        assert_eq!(cache.stats().evictions(), 1);
    }

    #[test]
    fn test_get_promotes_entry() {
        let cache = LookupCache::with_capacity(2);
        cache.insert(NameKey::new("a"), vec![place("a")]);
        cache.insert(NameKey::new("b"), vec![place("b")]);

        assert!(cache.get(&NameKey::new("a")).is_some());
        cache.insert(NameKey::new("c"), vec![place("c")]);

        assert!(cache.contains(&NameKey::new("a")));
        assert!(!cache.contains(&NameKey::new("b")));
    }

    #[test]
    fn test_empty_results_are_not_stored() {
        let cache: LookupCache<NameKey> = LookupCache::with_capacity(4);
        cache.insert(NameKey::new("nowhere"), Vec::new());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reinsert_same_key_replaces_without_eviction() {
        let cache = LookupCache::with_capacity(2);
        cache.insert(NameKey::new("a"), vec![place("old")]);
        cache.insert(NameKey::new("a"), vec![place("new")]);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions(), 0);
        assert_eq!(cache.get(&NameKey::new("a")).unwrap()[0].name, "new");
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let cache: LookupCache<CoordKey> = LookupCache::with_capacity(0);
        assert_eq!(cache.capacity(), 1);
    }

    #[test]
    fn test_hit_and_miss_counters() {
        let cache = LookupCache::with_capacity(2);
        cache.insert(CoordKey::new(1.0, 2.0), vec![place("x")]);
        let _ = cache.get(&CoordKey::new(1.0, 2.0));
        let _ = cache.get(&CoordKey::new(3.0, 4.0));
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 1);
    }
}
