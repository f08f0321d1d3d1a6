//! History-Gated Admission Cache (LRU-K style)
//!
//! A key is only cached once it has been seen `admission_threshold` times.
//! Until then the cache remembers just how often the key was seen, in a
//! bounded LRU history that holds no values. Both `put` and a `get` miss
//! count as a sighting.
//!
//! ```text
//!   put(k, v) / get(k) miss
//!          │
//!          ▼
//!   ┌──────────────────────┐   count reaches    ┌────────────────────────┐
//!   │ history (LRU, keys)  │ ── threshold ────► │ main (LRU, key+value)  │
//!   │ k3:1  k7:2  k1:1 ... │   on a put         │ ...                    │
//!   └──────────────────────┘                    └────────────────────────┘
//!     oldest sightings are forgotten when full
//! ```
//!
//! A key that reaches the threshold on a `get` has no value to admit; it is
//! admitted by the next `put`.
//!
//! # Examples
//!
//! ```
//! use arc_cache::HistoryCache;
//!
//! let cache = HistoryCache::new(10, 2);
//! cache.put("k", 1);
//! assert_eq!(cache.get(&"k"), None); // first sighting is only remembered
//! cache.put("k", 2);
//! assert_eq!(cache.get(&"k"), Some(2));
//! ```

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::config::HistoryCacheConfig;
use crate::error::ConfigError;
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use crate::policy::CachePolicy;
use crate::recency::RecencyStore;
use crate::DefaultHashBuilder;

pub(crate) struct HistorySegment<K, V, S = DefaultHashBuilder> {
    config: HistoryCacheConfig,
    main: RecencyStore<K, V, S>,
    history: RecencyStore<K, (), S>,
    metrics: CoreCacheMetrics,
    admissions: u64,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> HistorySegment<K, V, S> {
    pub(crate) fn init(config: HistoryCacheConfig, hash_builder: S) -> Self {
        HistorySegment {
            config,
            main: RecencyStore::with_hasher(config.capacity, 0, usize::MAX, hash_builder.clone()),
            history: RecencyStore::with_hasher(
                config.history_capacity,
                0,
                config.admission_threshold,
                hash_builder,
            ),
            metrics: CoreCacheMetrics::new(),
            admissions: 0,
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> HistorySegment<K, V, S> {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.main.len()
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.config.capacity
    }

    /// Records a sighting of `key` and returns `true` once it qualifies.
    fn sight(&mut self, key: &K) -> bool {
        if let Some((_, qualified)) = self.history.get(key) {
            return qualified;
        }
        if self.config.admission_threshold <= 1 {
            return true;
        }
        self.history.put(key.clone(), ());
        false
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.main.contains(key) {
            self.metrics.record_hit();
            return self.main.get(key).map(|(value, _)| value);
        }
        self.metrics.record_miss();
        None
    }

    pub(crate) fn record_miss_sighting(&mut self, key: &K) {
        self.sight(key);
    }

    pub(crate) fn put(&mut self, key: K, value: V) {
        if self.main.contains(&key) {
            self.main.put(key, value);
            return;
        }
        if !self.sight(&key) || self.config.capacity == 0 {
            return;
        }

        self.history.remove(&key);
        if self.main.put(key, value).is_some() {
            self.metrics.record_eviction();
        }
        self.metrics.record_insertion();
        self.admissions += 1;
        trace!("admitted key from history");
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.main.contains(key)
    }

    /// Number of keys still waiting in the history.
    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.main.remove(key).map(|(_, value)| value)
    }

    pub(crate) fn clear(&mut self) {
        self.main.clear(self.config.capacity);
        self.history.clear(self.config.history_capacity);
    }

    pub(crate) fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.metrics.to_btreemap();
        metrics.insert("admissions".to_string(), self.admissions as f64);
        metrics.insert("history_len".to_string(), self.history.len() as f64);
        metrics
    }
}

impl<K, V, S> fmt::Debug for HistorySegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistorySegment")
            .field("config", &self.config)
            .field("main", &self.main)
            .field("history", &self.history)
            .finish()
    }
}

/// A thread-safe cache that admits keys only after repeated sightings.
pub struct HistoryCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<HistorySegment<K, V, S>>,
}

impl<K: Hash + Eq + Clone, V> HistoryCache<K, V> {
    /// Creates a cache with a history as large as the main capacity.
    pub fn new(capacity: usize, admission_threshold: usize) -> Self {
        Self::init(
            HistoryCacheConfig {
                capacity,
                history_capacity: capacity,
                admission_threshold,
            },
            None,
        )
    }

    /// Creates a cache from a config, clamping a zero threshold to 1.
    pub fn init(config: HistoryCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates a cache from a config, rejecting out-of-range values.
    pub fn try_init(
        config: HistoryCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::init(config, hasher))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> HistoryCache<K, V, S> {
    /// Creates a cache with a custom hash builder.
    pub fn init_with_hasher(mut config: HistoryCacheConfig, hash_builder: S) -> Self {
        if config.capacity == 0 {
            warn!("history cache configured with zero capacity; every lookup will miss");
        }
        if config.admission_threshold == 0 {
            warn!("admission threshold of zero raised to 1");
            config.admission_threshold = 1;
        }
        HistoryCache {
            segment: Mutex::new(HistorySegment::init(config, hash_builder)),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> HistoryCache<K, V, S> {
    /// Records a sighting of `key` and caches the value once admitted.
    pub fn put(&self, key: K, value: V) {
        self.segment.lock().put(key, value);
    }

    /// Returns the cached value. A miss counts as a sighting of `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut segment = self.segment.lock();
        if let Some(value) = segment.get(key) {
            return Some(value.clone());
        }
        segment.record_miss_sighting(key);
        None
    }

    /// Calls `f` with the value while the lock is held. A miss counts as a
    /// sighting of `key`.
    pub fn get_with<F, R>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        let mut segment = self.segment.lock();
        if let Some(value) = segment.get(key) {
            return Some(f(value));
        }
        segment.record_miss_sighting(key);
        None
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

    /// Number of keys seen but not yet admitted.
    pub fn history_len(&self) -> usize {
        self.segment.lock().history_len()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for HistoryCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU-K"
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> CachePolicy<K, V> for HistoryCache<K, V, S> {
    fn put(&self, key: K, value: V) {
        HistoryCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        HistoryCache::get(self, key)
    }

    fn get_with<R, F>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        HistoryCache::get_with(self, key, f)
    }

    fn remove(&self, key: &K) -> Option<V> {
        HistoryCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        HistoryCache::contains(self, key)
    }

    fn len(&self) -> usize {
        HistoryCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.cap()
    }

    fn clear(&self) {
        HistoryCache::clear(self);
    }
}

impl<K, V, S> fmt::Debug for HistoryCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}
