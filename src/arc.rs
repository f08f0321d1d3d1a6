//! Adaptive Replacement Cache (ARC) Implementation
//!
//! ARC splits a fixed capacity between two tiers and moves capacity between
//! them in response to the workload:
//!
//! - the **recency tier** is an LRU list that every new key enters;
//! - the **frequency tier** is an LFU structure holding keys that were
//!   accessed `transform_threshold` times while in the recency tier.
//!
//! Each tier remembers the keys it recently evicted in a bounded ghost list.
//! A `put` for a ghosted key means that tier was evicting too early, so one
//! unit of capacity is moved to it from the other tier.
//!
//! # How the Algorithm Works
//!
//! ```text
//!                   capacity_total = recency + frequency (always)
//!   ┌──────────────────────────────┬──────────────────────────────┐
//!   │        recency tier          │        frequency tier        │
//!   │  main: LRU list              │  main: frequency buckets     │
//!   │  ghost: evicted keys         │  ghost: evicted keys         │
//!   └──────────────┬───────────────┴──────────────▲───────────────┘
//!                  │   count reaches threshold    │
//!                  └──────── promotion ───────────┘
//!                       (one unit moves along)
//! ```
//!
//! ## Put
//!
//! 1. Key resident in the frequency tier: update the value, count an access.
//! 2. Key resident in the recency tier: count an access. If that reaches the
//!    threshold, move the entry to the frequency tier together with one unit
//!    of capacity; otherwise update the value in place.
//! 3. Key in the recency ghost list: move one unit frequency → recency and
//!    insert the key into the recency tier.
//! 4. Key in the frequency ghost list: move one unit recency → frequency and
//!    insert the key into the frequency tier.
//! 5. New key: insert into the recency tier.
//!
//! ## Get
//!
//! Probes the frequency tier, then the recency tier. A recency hit that
//! reaches the threshold promotes exactly as in put case 2. Reads never touch
//! the ghost lists.
//!
//! ## Capacity Split
//!
//! The split starts with all capacity in the recency tier. A transfer moves
//! one unit from donor to recipient, shrinking the donor first (which may
//! evict into its ghost list). When the donor has nothing left no unit moves,
//! so the two main capacities always add up to the total.
//!
//! When the recency tier owns no capacity, a new key is not cached but is
//! recorded in the recency ghost list. Putting it again is a recency ghost
//! hit, which moves one unit back, so the tier can always regain capacity.
//!
//! # Thread Safety
//!
//! `ArcCache` holds its state behind one `parking_lot::Mutex`, taken for the
//! whole of every public operation. For multi-threaded workloads with many
//! distinct keys, [`ConcurrentArcCache`](crate::ConcurrentArcCache) shards
//! the key space over independent instances.
//!
//! # Examples
//!
//! ```
//! use arc_cache::ArcCache;
//!
//! let cache = ArcCache::new(2, 2);
//! cache.put("a", 1);
//! assert_eq!(cache.get(&"a"), Some(1)); // second access: promoted
//! assert_eq!(cache.frequency_capacity(), 1);
//!
//! cache.put("b", 2);
//! cache.put("c", 3); // evicts "b" from the one-slot recency tier
//! assert_eq!(cache.get(&"b"), None);
//! assert_eq!(cache.get(&"a"), Some(1));
//! ```

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::ArcCacheConfig;
use crate::error::{ConfigError, InvariantError};
use crate::frequency::FrequencyStore;
use crate::metrics::{ArcCacheMetrics, CacheMetrics};
use crate::policy::CachePolicy;
use crate::recency::RecencyStore;
use crate::{DefaultHashBuilder, HashMap};

/// How the total capacity is currently divided between the two tiers.
///
/// The frequency share is derived, so the two shares cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacitySplit {
    total: usize,
    recency: usize,
}

impl CapacitySplit {
    /// All capacity starts in the recency tier.
    pub const fn new(total: usize) -> Self {
        CapacitySplit {
            total,
            recency: total,
        }
    }

    /// Total capacity of both tiers.
    #[inline]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Main capacity of the recency tier.
    #[inline]
    pub const fn recency(&self) -> usize {
        self.recency
    }

    /// Main capacity of the frequency tier.
    #[inline]
    pub const fn frequency(&self) -> usize {
        self.total - self.recency
    }

    /// Moves one unit to the frequency tier. Returns `false` if the recency
    /// tier had none to give.
    pub(crate) fn shift_to_frequency(&mut self) -> bool {
        if self.recency == 0 {
            return false;
        }
        self.recency -= 1;
        true
    }

    /// Moves one unit to the recency tier. Returns `false` if the frequency
    /// tier had none to give.
    pub(crate) fn shift_to_recency(&mut self) -> bool {
        if self.recency == self.total {
            return false;
        }
        self.recency += 1;
        true
    }
}

/// Which of the four lists a key is currently indexed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Residency {
    /// Resident in the recency tier.
    Recency,
    /// Resident in the frequency tier.
    Frequency,
    /// Recently evicted from the recency tier; the value is gone.
    RecencyGhost,
    /// Recently evicted from the frequency tier; the value is gone.
    FrequencyGhost,
}

/// Internal ARC state. The public [`ArcCache`] wraps it in a mutex.
pub(crate) struct ArcSegment<K, V, S = DefaultHashBuilder> {
    config: ArcCacheConfig,
    split: CapacitySplit,
    recency: RecencyStore<K, V, S>,
    frequency: FrequencyStore<K, V, S>,
    metrics: ArcCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> ArcSegment<K, V, S> {
    /// Builds a segment from an already normalized config.
    pub(crate) fn init(config: ArcCacheConfig, hash_builder: S) -> Self {
        let split = CapacitySplit::new(config.capacity);
        ArcSegment {
            config,
            split,
            recency: RecencyStore::with_hasher(
                split.recency(),
                config.capacity,
                config.transform_threshold,
                hash_builder.clone(),
            ),
            frequency: FrequencyStore::with_hasher(
                split.frequency(),
                config.capacity,
                config.max_average_frequency,
                hash_builder,
            ),
            metrics: ArcCacheMetrics::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> ArcSegment<K, V, S> {
    #[inline]
    pub(crate) fn split(&self) -> CapacitySplit {
        self.split
    }

    #[inline]
    pub(crate) fn transform_threshold(&self) -> usize {
        self.config.transform_threshold
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.recency.len() + self.frequency.len()
    }

    pub(crate) fn put(&mut self, key: K, value: V) {
        if self.frequency.contains(&key) {
            self.frequency.put(key, value);
            return;
        }

        match self.recency.get(&key).map(|(_, promote)| promote) {
            Some(true) => {
                self.recency.remove(&key);
                self.promote(key, value);
                return;
            }
            Some(false) => {
                self.recency.put(key, value);
                return;
            }
            None => {}
        }

        if self.recency.remove_from_ghost(&key) {
            self.metrics.recency_ghost_hits += 1;
            trace!("recency ghost hit");
            self.transfer_to_recency();
            self.insert_recency(key, value);
            return;
        }

        if self.frequency.remove_from_ghost(&key) {
            self.metrics.frequency_ghost_hits += 1;
            trace!("frequency ghost hit");
            self.transfer_to_frequency();
            self.insert_frequency(key, value);
            return;
        }

        self.insert_recency(key, value);
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.frequency.contains(key) {
            self.metrics.core.record_hit();
            return self.frequency.get(key);
        }

        let promote = match self.recency.get(key) {
            Some((_, promote)) => promote,
            None => {
                self.metrics.core.record_miss();
                return None;
            }
        };
        self.metrics.core.record_hit();

        if promote {
            if let Some((owned, value)) = self.recency.remove(key) {
                self.promote(owned, value);
            }
            return self.frequency.peek(key);
        }
        self.recency.peek(key)
    }

    /// Moves an entry already detached from the recency tier into the
    /// frequency tier, along with one unit of capacity.
    fn promote(&mut self, key: K, value: V) {
        self.transfer_to_frequency();
        self.insert_frequency(key, value);
        self.metrics.promotions += 1;
        trace!(
            recency_capacity = self.split.recency(),
            frequency_capacity = self.split.frequency(),
            "promoted entry to frequency tier"
        );
    }

    fn insert_recency(&mut self, key: K, value: V) {
        if self.recency.capacity() == 0 {
            trace!("recency tier has no capacity, key recorded as ghost");
            self.recency.record_ghost(key);
            return;
        }
        if self.recency.put(key, value).is_some() {
            self.metrics.core.record_eviction();
        }
        self.metrics.core.record_insertion();
    }

    fn insert_frequency(&mut self, key: K, value: V) {
        if self.frequency.capacity() == 0 {
            trace!("frequency tier has no capacity, insert dropped");
            return;
        }
        if self.frequency.put(key, value).is_some() {
            self.metrics.core.record_eviction();
        }
        self.metrics.core.record_insertion();
    }

    fn transfer_to_frequency(&mut self) {
        if !self.split.shift_to_frequency() {
            return;
        }
        if self.recency.decrease_capacity().is_some() {
            self.metrics.core.record_eviction();
        }
        self.frequency.increase_capacity();
        self.metrics.capacity_transfers += 1;
        debug!(
            recency_capacity = self.split.recency(),
            frequency_capacity = self.split.frequency(),
            "capacity moved to frequency tier"
        );
    }

    fn transfer_to_recency(&mut self) {
        if !self.split.shift_to_recency() {
            return;
        }
        if self.frequency.decrease_capacity().is_some() {
            self.metrics.core.record_eviction();
        }
        self.recency.increase_capacity();
        self.metrics.capacity_transfers += 1;
        debug!(
            recency_capacity = self.split.recency(),
            frequency_capacity = self.split.frequency(),
            "capacity moved to recency tier"
        );
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.frequency.peek(key).or_else(|| self.recency.peek(key))
    }

    pub(crate) fn residency<Q>(&self, key: &Q) -> Option<Residency>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.frequency.contains(key) {
            Some(Residency::Frequency)
        } else if self.recency.contains(key) {
            Some(Residency::Recency)
        } else if self.recency.check_ghost(key) {
            Some(Residency::RecencyGhost)
        } else if self.frequency.check_ghost(key) {
            Some(Residency::FrequencyGhost)
        } else {
            None
        }
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.frequency
            .remove(key)
            .or_else(|| self.recency.remove(key))
            .map(|(_, value)| value)
    }

    /// Drops every entry and ghost and restores the initial split.
    pub(crate) fn clear(&mut self) {
        self.split = CapacitySplit::new(self.config.capacity);
        self.recency.clear(self.split.recency());
        self.frequency.clear(self.split.frequency());
    }

    pub(crate) fn metrics(&self) -> ArcCacheMetrics {
        let mut metrics = self.metrics.clone();
        metrics.decays = self.frequency.decay_passes();
        metrics.recency_capacity = self.split.recency() as u64;
        metrics.frequency_capacity = self.split.frequency() as u64;
        metrics
    }

    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.recency.capacity() != self.split.recency()
            || self.frequency.capacity() != self.split.frequency()
        {
            return Err(InvariantError::new(format!(
                "tier capacities {}+{} do not match split {:?}",
                self.recency.capacity(),
                self.frequency.capacity(),
                self.split
            )));
        }
        if self.recency.capacity() + self.frequency.capacity() != self.config.capacity {
            return Err(InvariantError::new(format!(
                "tier capacities {}+{} do not add up to {}",
                self.recency.capacity(),
                self.frequency.capacity(),
                self.config.capacity
            )));
        }

        let mut seen: HashMap<&K, ()> = HashMap::with_capacity(
            self.len() + self.recency.ghost_len() + self.frequency.ghost_len(),
        );
        let all = self
            .recency
            .keys()
            .chain(self.recency.ghost_keys())
            .chain(self.frequency.keys())
            .chain(self.frequency.ghost_keys());
        for key in all {
            if seen.insert(key, ()).is_some() {
                return Err(InvariantError::new("key indexed in more than one list"));
            }
        }

        if self.recency.ghost_len() > self.recency.ghost_capacity() {
            return Err(InvariantError::new("recency ghost list over capacity"));
        }
        if self.frequency.ghost_len() > self.frequency.ghost_capacity() {
            return Err(InvariantError::new("frequency ghost list over capacity"));
        }

        if !self.recency.is_consistent() {
            return Err(InvariantError::new("recency index and list disagree"));
        }
        self.frequency.check_consistency().map_err(InvariantError::new)
    }
}

impl<K, V, S> fmt::Debug for ArcSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcSegment")
            .field("split", &self.split)
            .field("transform_threshold", &self.config.transform_threshold)
            .field("recency", &self.recency)
            .field("frequency", &self.frequency)
            .finish()
    }
}

/// A thread-safe Adaptive Replacement Cache.
///
/// See the [module documentation](self) for the algorithm.
///
/// # Type Parameters
///
/// - `K`: key type, `Hash + Eq + Clone`.
/// - `V`: value type. Reads return clones, so most methods need `V: Clone`.
/// - `S`: hash builder. Defaults to `DefaultHashBuilder`.
pub struct ArcCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<ArcSegment<K, V, S>>,
}

impl<K: Hash + Eq + Clone, V> ArcCache<K, V> {
    /// Creates a cache with the given total capacity and promotion threshold.
    pub fn new(capacity: usize, transform_threshold: usize) -> Self {
        Self::init(ArcCacheConfig::new(capacity, transform_threshold), None)
    }

    /// Creates a cache from a config, clamping out-of-range values.
    ///
    /// A zero capacity yields a cache that never holds an entry. A zero
    /// threshold is raised to 1. Both are logged as warnings.
    pub fn init(config: ArcCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }

    /// Creates a cache from a config, rejecting out-of-range values.
    pub fn try_init(
        config: ArcCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::init(config, hasher))
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> ArcCache<K, V, S> {
    /// Creates a cache with a custom hash builder, clamping like [`ArcCache::init`].
    pub fn init_with_hasher(mut config: ArcCacheConfig, hash_builder: S) -> Self {
        if config.capacity == 0 {
            warn!("ARC cache configured with zero capacity; every lookup will miss");
        }
        if config.transform_threshold == 0 {
            warn!("ARC transform threshold of zero raised to 1");
            config.transform_threshold = 1;
        }
        ArcCache {
            segment: Mutex::new(ArcSegment::init(config, hash_builder)),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> ArcCache<K, V, S> {
    /// Inserts or updates `key`.
    pub fn put(&self, key: K, value: V) {
        self.segment.lock().put(key, value);
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

    /// Counts an access to `key` and calls `f` with its value while the lock
    /// is held, avoiding a clone.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Returns the value for `key` or `V::default()` if it is absent.
    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone + Default,
    {
        self.get(key).unwrap_or_default()
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

    /// Returns `true` if `key` is resident in either tier. Ghosts do not count.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        matches!(
            self.residency(key),
            Some(Residency::Recency | Residency::Frequency)
        )
    }

    /// Reports which list `key` is indexed in, without side effects.
    pub fn residency<Q>(&self, key: &Q) -> Option<Residency>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().residency(key)
    }

    /// Removes a resident key. The key is not recorded as a ghost.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().remove(key)
    }

    /// Drops all entries and ghosts and restores the initial capacity split.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Total capacity of both tiers.
    pub fn capacity(&self) -> usize {
        self.segment.lock().split().total()
    }

    /// Current main capacity of the recency tier.
    pub fn recency_capacity(&self) -> usize {
        self.segment.lock().split().recency()
    }

    /// Current main capacity of the frequency tier.
    pub fn frequency_capacity(&self) -> usize {
        self.segment.lock().split().frequency()
    }

    /// Snapshot of the current capacity split.
    pub fn split(&self) -> CapacitySplit {
        self.segment.lock().split()
    }

    pub fn transform_threshold(&self) -> usize {
        self.segment.lock().transform_threshold()
    }

    /// Number of resident entries across both tiers.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verifies the internal bookkeeping and reports the first violation.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.lock().check_invariants()
    }

    /// Typed snapshot of the ARC counters.
    pub fn arc_metrics(&self) -> ArcCacheMetrics {
        self.segment.lock().metrics()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for ArcCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.arc_metrics().to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "ARC"
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> CachePolicy<K, V> for ArcCache<K, V, S> {
    fn put(&self, key: K, value: V) {
        ArcCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        ArcCache::get(self, key)
    }

    fn get_with<R, F>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        ArcCache::get_with(self, key, f)
    }

    fn remove(&self, key: &K) -> Option<V> {
        ArcCache::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        ArcCache::contains(self, key)
    }

    fn len(&self) -> usize {
        ArcCache::len(self)
    }

    fn capacity(&self) -> usize {
        ArcCache::capacity(self)
    }

    fn clear(&self) {
        ArcCache::clear(self);
    }
}

impl<K, V, S> fmt::Debug for ArcCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_transfers() {
        let mut split = CapacitySplit::new(2);
        assert_eq!((split.recency(), split.frequency()), (2, 0));
        assert!(!split.shift_to_recency());
        assert!(split.shift_to_frequency());
        assert!(split.shift_to_frequency());
        assert!(!split.shift_to_frequency());
        assert_eq!((split.recency(), split.frequency()), (0, 2));
        assert!(split.shift_to_recency());
        assert_eq!(split.recency() + split.frequency(), split.total());
    }

    #[test]
    fn test_arc_get_put() {
        let cache = ArcCache::new(4, 3);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.get(&"b"), Some(2));
        assert_eq!(cache.get(&"c"), None);
        assert_eq!(cache.len(), 2);
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_arc_update_existing() {
        let cache = ArcCache::new(4, 10);
        cache.put("a", 1);
        cache.put("a", 2);
        assert_eq!(cache.get(&"a"), Some(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.residency(&"a"), Some(Residency::Recency));
    }

    #[test]
    fn test_arc_promotion_on_get() {
        let cache = ArcCache::new(2, 2);
        cache.put(1, "A");
        assert_eq!(cache.get(&1), Some("A"));
        assert_eq!(cache.residency(&1), Some(Residency::Frequency));
        assert_eq!(cache.recency_capacity(), 1);
        assert_eq!(cache.frequency_capacity(), 1);
        assert_eq!(cache.get(&1), Some("A"));
        assert_eq!(cache.frequency_capacity(), 1);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_arc_promotion_on_put() {
        let cache = ArcCache::new(3, 2);
        cache.put(1, "A");
        cache.put(1, "B");
        assert_eq!(cache.residency(&1), Some(Residency::Frequency));
        assert_eq!(cache.peek(&1), Some("B"));
        assert_eq!(cache.split(), {
            let mut split = CapacitySplit::new(3);
            split.shift_to_frequency();
            split
        });
    }

    #[test]
    fn test_arc_frequency_hit_updates_value() {
        let cache = ArcCache::new(2, 2);
        cache.put(1, "A");
        cache.get(&1);
        cache.put(1, "Z");
        assert_eq!(cache.get(&1), Some("Z"));
        assert_eq!(cache.residency(&1), Some(Residency::Frequency));
    }

    #[test]
    fn test_arc_get_never_touches_ghosts() {
        let cache = ArcCache::new(1, 5);
        cache.put(1, "A");
        cache.put(2, "B");
        assert_eq!(cache.residency(&1), Some(Residency::RecencyGhost));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.residency(&1), Some(Residency::RecencyGhost));
        assert_eq!(cache.recency_capacity(), 1);
        assert!(!cache.contains(&1));
    }

    #[test]
    fn test_arc_recency_ghost_hit_moves_capacity_back() {
        let cache = ArcCache::new(3, 2);
        cache.put(1, "A");
        cache.get(&1); // promote: recency 2, frequency 1
        cache.put(2, "B");
        cache.put(3, "C");
        cache.put(4, "D"); // evicts 2 into the recency ghost list
        assert_eq!(cache.residency(&2), Some(Residency::RecencyGhost));

        cache.put(2, "B");
        assert_eq!(cache.recency_capacity(), 3);
        assert_eq!(cache.frequency_capacity(), 0);
        assert_eq!(cache.residency(&2), Some(Residency::Recency));
        // shrinking the frequency tier ghosted key 1
        assert_eq!(cache.residency(&1), Some(Residency::FrequencyGhost));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_arc_frequency_ghost_hit_moves_capacity_forward() {
        let cache = ArcCache::new(3, 2);
        cache.put(1, "A");
        cache.get(&1);
        cache.put(2, "B");
        cache.put(3, "C");
        cache.put(4, "D");
        cache.put(2, "B"); // recency ghost hit ghosts key 1 from frequency
        assert_eq!(cache.residency(&1), Some(Residency::FrequencyGhost));

        cache.put(1, "A2");
        assert_eq!(cache.residency(&1), Some(Residency::Frequency));
        assert_eq!(cache.frequency_capacity(), 1);
        assert_eq!(cache.recency_capacity(), 2);
        assert_eq!(cache.get(&1), Some("A2"));

        let metrics = cache.arc_metrics();
        assert_eq!(metrics.recency_ghost_hits, 1);
        assert_eq!(metrics.frequency_ghost_hits, 1);
        assert_eq!(metrics.promotions, 1);
        assert_eq!(metrics.capacity_transfers, 3);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_arc_zero_capacity_always_misses() {
        let cache = ArcCache::new(0, 2);
        cache.put(1, "A");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 0);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_arc_zero_threshold_is_clamped() {
        let cache: ArcCache<i32, i32> = ArcCache::new(4, 0);
        assert_eq!(cache.transform_threshold(), 1);
        let result = ArcCache::<i32, i32>::try_init(ArcCacheConfig::new(4, 0), None);
        assert_eq!(result.err(), Some(ConfigError::ZeroThreshold));
    }

    #[test]
    fn test_arc_threshold_one_promotes_on_first_access() {
        let cache = ArcCache::new(2, 1);
        cache.put(1, "A");
        assert_eq!(cache.residency(&1), Some(Residency::Recency));
        cache.get(&1);
        assert_eq!(cache.residency(&1), Some(Residency::Frequency));
    }

    #[test]
    fn test_arc_recency_tier_without_capacity_ghosts_new_keys() {
        let cache = ArcCache::new(2, 2);
        cache.put(1, "A");
        cache.get(&1);
        cache.put(2, "B");
        cache.get(&2);
        assert_eq!(cache.recency_capacity(), 0);
        cache.put(3, "C");
        assert!(!cache.contains(&3));
        assert_eq!(cache.residency(&3), Some(Residency::RecencyGhost));
        assert_eq!(cache.len(), 2);
        assert!(cache.check_invariants().is_ok());

        // The second put is a recency ghost hit and takes a unit back.
        cache.put(3, "C");
        assert_eq!(cache.residency(&3), Some(Residency::Recency));
        assert_eq!(cache.recency_capacity(), 1);
        assert_eq!(cache.frequency_capacity(), 1);
        assert_eq!(cache.residency(&1), Some(Residency::FrequencyGhost));
        assert_eq!(cache.len(), 2);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_arc_remove_and_clear() {
        let cache = ArcCache::new(3, 2);
        cache.put(1, "A");
        cache.get(&1);
        cache.put(2, "B");
        assert_eq!(cache.remove(&1), Some("A"));
        assert_eq!(cache.remove(&2), Some("B"));
        assert_eq!(cache.remove(&3), None);
        assert_eq!(cache.residency(&1), None);
        assert!(cache.is_empty());

        cache.put(4, "D");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.recency_capacity(), 3);
        assert_eq!(cache.frequency_capacity(), 0);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_arc_get_with_and_default() {
        let cache = ArcCache::new(2, 5);
        cache.put("k", String::from("value"));
        assert_eq!(cache.get_with(&"k", |v| v.len()), Some(5));
        assert_eq!(cache.get_or_default(&"missing"), String::new());
    }

    #[test]
    fn test_arc_string_keys_borrowed_lookup() {
        let cache = ArcCache::new(2, 2);
        cache.put(String::from("alpha"), 1);
        assert_eq!(cache.get("alpha"), Some(1));
        assert!(cache.contains("alpha"));
        assert_eq!(cache.remove("alpha"), Some(1));
    }

    #[test]
    fn test_arc_metrics() {
        let cache = ArcCache::new(2, 2);
        cache.put(1, "A");
        cache.put(2, "B");
        cache.get(&1);
        cache.get(&9);
        cache.put(3, "C");

        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests"), Some(&2.0));
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("promotions"), Some(&1.0));
        assert_eq!(metrics.get("insertions"), Some(&4.0));
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(metrics.get("recency_capacity"), Some(&1.0));
        assert_eq!(metrics.get("frequency_capacity"), Some(&1.0));
        assert_eq!(cache.algorithm_name(), "ARC");
    }

    #[test]
    fn test_arc_decay_through_config() {
        let config = ArcCacheConfig::new(4, 2)
            .with_max_average_frequency(core::num::NonZeroUsize::new(2).unwrap());
        let cache = ArcCache::init(config, None);
        cache.put(1, "A");
        for _ in 0..10 {
            cache.get(&1);
        }
        assert!(cache.arc_metrics().decays > 0);
        assert_eq!(cache.get(&1), Some("A"));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_arc_segment_directly() {
        let mut segment: ArcSegment<i32, i32> =
            ArcSegment::init(ArcCacheConfig::new(2, 2), DefaultHashBuilder::default());
        segment.put(1, 10);
        assert_eq!(segment.get(&1), Some(&10));
        assert_eq!(segment.residency(&1), Some(Residency::Frequency));
        assert_eq!(segment.len(), 1);
        assert!(segment.check_invariants().is_ok());
    }

    #[test]
    fn test_check_invariants_detects_key_in_two_lists() {
        let mut segment: ArcSegment<i32, i32> =
            ArcSegment::init(ArcCacheConfig::new(4, 3), DefaultHashBuilder::default());
        segment.put(1, 10);
        segment.put(2, 20);
        assert!(segment.check_invariants().is_ok());

        segment.recency.record_ghost(1);
        let err = segment.check_invariants().unwrap_err();
        assert!(err.to_string().contains("more than one list"));
    }

    #[test]
    fn test_arc_shared_across_scoped_threads() {
        let cache: ArcCache<u32, u32> = ArcCache::new(32, 2);
        let mut pool = scoped_threadpool::Pool::new(4);
        pool.scoped(|scope| {
            for t in 0..4u32 {
                let cache = &cache;
                scope.execute(move || {
                    for i in 0..200 {
                        let key = (t * 7 + i) % 48;
                        cache.put(key, i);
                        let _ = cache.get(&key);
                    }
                });
            }
        });
        assert!(cache.len() <= 32);
        assert!(cache.check_invariants().is_ok());
    }
}
