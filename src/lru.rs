//! Least Recently Used (LRU) Cache Implementation
//!
//! The plain single-policy recency cache. It is the recency tier of
//! [`ArcCache`](crate::ArcCache) with the ghost list and promotion switched
//! off, and serves as the baseline the adaptive cache is compared against.
//!
//! # Algorithm
//!
//! Entries are kept in order of last use. `get` and `put` move an entry to
//! the front; when the cache is full the entry at the back is evicted before
//! the new one is inserted.
//!
//! # Performance Characteristics
//!
//! - Get / Put / Remove: O(1)
//! - Space: O(n) in the capacity
//!
//! # When to Use
//!
//! LRU is a good default for workloads with temporal locality. It suffers
//! under scans: a long run of one-off keys flushes the whole cache, which is
//! what ARC's frequency tier protects against.
//!
//! # Thread Safety
//!
//! `LruCache` locks a `parking_lot::Mutex` for every operation and can be
//! shared through an `Arc`.
//!
//! # Examples
//!
//! ```
//! use arc_cache::LruCache;
//!
//! let cache = LruCache::new(2);
//! cache.put("apple", 1);
//! cache.put("banana", 2);
//! assert_eq!(cache.get(&"apple"), Some(1));
//!
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

use crate::config::LruCacheConfig;
use crate::error::ConfigError;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::policy::CachePolicy;
use crate::recency::RecencyStore;
use crate::DefaultHashBuilder;

/// Internal LRU state: a recency store without ghosts or promotion.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    store: RecencyStore<K, V, S>,
    metrics: CoreCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> LruSegment<K, V, S> {
    pub(crate) fn init(config: LruCacheConfig, hash_builder: S) -> Self {
        LruSegment {
            config,
            store: RecencyStore::with_hasher(config.capacity, 0, usize::MAX, hash_builder),
            metrics: CoreCacheMetrics::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruSegment<K, V, S> {
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
        match self.store.get(key) {
            Some((value, _)) => {
                self.metrics.record_hit();
                Some(value)
            }
            None => {
                self.metrics.record_miss();
                None
            }
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

    pub(crate) fn metrics(&self) -> &CoreCacheMetrics {
        &self.metrics
    }
}

impl<K, V, S> fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSegment")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish()
    }
}

/// A thread-safe Least Recently Used cache.
///
/// # Examples
///
/// ```
/// use arc_cache::config::LruCacheConfig;
/// use arc_cache::LruCache;
///
/// let cache: LruCache<String, u32> = LruCache::init(LruCacheConfig { capacity: 100 }, None);
/// cache.put("k".to_string(), 7);
/// assert_eq!(cache.get("k"), Some(7));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<LruSegment<K, V, S>>,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Creates an LRU cache holding up to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::init(LruCacheConfig { capacity }, None)
    }

    /// Creates a cache from a config. A zero capacity is logged and yields a
    /// cache that never holds an entry.
    pub fn init(config: LruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates a cache from a config, rejecting a zero capacity.
    pub fn try_init(
        config: LruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::init(config, hasher))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> LruCache<K, V, S> {
    /// Creates a cache with a custom hash builder.
    pub fn init_with_hasher(config: LruCacheConfig, hash_builder: S) -> Self {
        if config.capacity == 0 {
            warn!("LRU cache configured with zero capacity; every lookup will miss");
        }
        LruCache {
            segment: Mutex::new(LruSegment::init(config, hash_builder)),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LruCache<K, V, S> {
    /// Inserts or updates `key`, returning the entry evicted to make room.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.segment.lock().put(key, value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Calls `f` with the value while the lock is held.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
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
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> CachePolicy<K, V> for LruCache<K, V, S> {
    fn put(&self, key: K, value: V) {
        LruCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn get_with<R, F>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        LruCache::get_with(self, key, f)
    }

    fn remove(&self, key: &K) -> Option<V> {
        LruCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap()
    }

    fn clear(&self) {
        LruCache::clear(self);
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}
