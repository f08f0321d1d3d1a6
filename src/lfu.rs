//! Least Frequently Used (LFU) Cache Implementation
//!
//! The plain single-policy frequency cache. It is the frequency tier of
//! [`ArcCache`](crate::ArcCache) on its own, without a ghost list and with a
//! fixed capacity, and serves as the frequency baseline the adaptive cache
//! is compared against.
//!
//! # Algorithm
//!
//! Every entry carries an access count; an insert counts as the first
//! access. When the cache is full, the entry with the lowest count is
//! evicted, and among entries with the same count the one that reached that
//! count first goes first.
//!
//! ## Aging
//!
//! Pure LFU never forgets: an entry that was hot an hour ago keeps its slot
//! long after the workload moved on. With `max_average_frequency` set, the
//! cache tracks the average count of its resident entries. When it exceeds
//! the maximum, every count drops by half the maximum (never below 1),
//! so old popularity fades while relative order is kept.
//!
//! # Performance Characteristics
//!
//! - Get / Put / Remove: O(log F) where F is the number of distinct counts
//! - Aging pass: O(n)
//! - Space: O(n) in the capacity
//!
//! # Examples
//!
//! ```
//! use arc_cache::LfuCache;
//!
//! let cache = LfuCache::new(2);
//! cache.put("apple", 1);
//! cache.put("banana", 2);
//! assert_eq!(cache.get(&"apple"), Some(1));
//!
//! // "banana" has the lowest count
//! cache.put("cherry", 3);
//! assert_eq!(cache.get(&"banana"), None);
//! assert_eq!(cache.get(&"apple"), Some(1));
//! ```

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::warn;

use crate::config::LfuCacheConfig;
use crate::error::{ConfigError, InvariantError};
use crate::frequency::FrequencyStore;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::policy::CachePolicy;
use crate::DefaultHashBuilder;

/// Internal LFU state: a frequency store without ghosts.
pub(crate) struct LfuSegment<K, V, S = DefaultHashBuilder> {
    config: LfuCacheConfig,
    store: FrequencyStore<K, V, S>,
    metrics: CoreCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> LfuSegment<K, V, S> {
    pub(crate) fn init(config: LfuCacheConfig, hash_builder: S) -> Self {
        LfuSegment {
            config,
            store: FrequencyStore::with_hasher(
                config.capacity,
                0,
                config.max_average_frequency,
                hash_builder,
            ),
            metrics: CoreCacheMetrics::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LfuSegment<K, V, S> {
    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.store.len()
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.store.contains(key) {
            self.metrics.record_hit();
            self.store.get(key)
        } else {
            self.metrics.record_miss();
            None
        }
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let inserting = !self.store.contains(&key) && self.config.capacity > 0;
        let evicted = self.store.put(key, value);
        if inserting {
            self.metrics.record_insertion();
        }
        if evicted.is_some() {
            self.metrics.record_eviction();
        }
        evicted
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.peek(key)
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.contains(key)
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.store.remove(key).map(|(_, value)| value)
    }

    pub(crate) fn clear(&mut self) {
        self.store.clear(self.config.capacity);
    }

    pub(crate) fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.metrics.to_btreemap();
        metrics.insert("decays".to_string(), self.store.decay_passes() as f64);
        metrics
    }

    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        self.store.check_consistency().map_err(InvariantError::new)
    }
}

impl<K, V, S> fmt::Debug for LfuSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuSegment")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}

/// A thread-safe Least Frequently Used cache.
///
/// # Examples
///
/// ```
/// use arc_cache::config::LfuCacheConfig;
/// use arc_cache::LfuCache;
/// use core::num::NonZeroUsize;
///
/// let config = LfuCacheConfig::new(100).with_max_average_frequency(NonZeroUsize::new(8).unwrap());
/// let cache: LfuCache<String, u32> = LfuCache::init(config, None);
/// cache.put("k".to_string(), 7);
/// assert_eq!(cache.get("k"), Some(7));
/// ```
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LfuSegment<K, V, S>>,
}

impl<K: Hash + Eq + Clone, V> LfuCache<K, V> {
    /// Creates an LFU cache holding up to `capacity` entries, without aging.
    pub fn new(capacity: usize) -> Self {
        Self::init(LfuCacheConfig::new(capacity), None)
    }

    /// Creates a cache from a config. A zero capacity is logged and yields a
    /// cache that never holds an entry.
    pub fn init(config: LfuCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates a cache from a config, rejecting a zero capacity.
    pub fn try_init(
        config: LfuCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::init(config, hasher))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> LfuCache<K, V, S> {
    /// Creates a cache with a custom hash builder.
    pub fn init_with_hasher(config: LfuCacheConfig, hash_builder: S) -> Self {
        if config.capacity == 0 {
            warn!("LFU cache configured with zero capacity; every lookup will miss");
        }
        LfuCache {
            segment: Mutex::new(LfuSegment::init(config, hash_builder)),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Inserts `key`, or updates it and counts an access. Returns the entry
    /// evicted to make room, if any.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.segment.lock().put(key, value)
    }

    /// Returns a clone of the value for `key`, counting the access.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Counts an access and calls `f` with the value while the lock is held.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Returns a clone of the value without counting an access.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().peek(key).cloned()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains(key)
    }

    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().remove(key)
    }

    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    pub fn cap(&self) -> usize {
        self.segment.lock().cap()
    }

    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verifies the bucket bookkeeping and reports the first violation.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.lock().check_invariants()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for LfuCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "LFU"
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> CachePolicy<K, V> for LfuCache<K, V, S> {
    fn put(&self, key: K, value: V) {
        LfuCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        LfuCache::get(self, key)
    }

    fn get_with<R, F>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        LfuCache::get_with(self, key, f)
    }

    fn remove(&self, key: &K) -> Option<V> {
        LfuCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap()
    }

    fn clear(&self) {
        LfuCache::clear(self);
    }
}

impl<K, V, S> fmt::Debug for LfuCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}
