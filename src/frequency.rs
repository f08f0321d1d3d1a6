//! Frequency tier of the ARC cache.
//!
//! Resident entries are grouped in buckets keyed by access count. Each bucket
//! is a FIFO chain, so among entries with the same count the one that entered
//! the bucket first is evicted first. `min_frequency` always names the lowest
//! non-empty bucket, which makes eviction O(1) amortized.
//!
//! ```text
//!   buckets: BTreeMap<usize, Links>          shared Arena<Node<K, V>>
//!   ┌────┐
//!   │ 1  │──► [k7] ─ [k2]          ◄── min_frequency, evict from the front
//!   │ 3  │──► [k4]
//!   │ 8  │──► [k1] ─ [k5] ─ [k9]
//!   └────┘
//!            get(k4): unlink from 3, link_back into 4
//! ```
//!
//! When a maximum average frequency is configured, the store runs a decay
//! pass whenever the average access count of resident entries exceeds it:
//! every count is lowered by half the maximum (never below 1) and the buckets
//! are rebuilt without disturbing the relative order of entries.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;
use std::collections::BTreeMap;

use tracing::debug;

use crate::ghost::GhostList;
use crate::list::{Arena, Links, NodeId};
use crate::node::Node;
use crate::{DefaultHashBuilder, HashMap};

pub(crate) struct FrequencyStore<K, V, S = DefaultHashBuilder> {
    capacity: usize,
    nodes: Arena<Node<K, V>>,
    buckets: BTreeMap<usize, Links>,
    min_frequency: usize,
    index: HashMap<K, NodeId, S>,
    ghost: GhostList<K, S>,
    max_average_frequency: Option<NonZeroUsize>,
    total_accesses: usize,
    decay_passes: u64,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> FrequencyStore<K, V, S> {
    pub(crate) fn with_hasher(
        capacity: usize,
        ghost_capacity: usize,
        max_average_frequency: Option<NonZeroUsize>,
        hash_builder: S,
    ) -> Self {
        FrequencyStore {
            capacity,
            nodes: Arena::with_capacity(capacity),
            buckets: BTreeMap::new(),
            min_frequency: 1,
            index: HashMap::with_capacity_and_hasher(capacity, hash_builder.clone()),
            ghost: GhostList::with_hasher(ghost_capacity, hash_builder),
            max_average_frequency,
            total_accesses: 0,
            decay_passes: 0,
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FrequencyStore<K, V, S> {
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub(crate) fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    #[inline]
    pub(crate) fn ghost_capacity(&self) -> usize {
        self.ghost.capacity()
    }

    #[cfg(test)]
    pub(crate) fn min_frequency(&self) -> usize {
        self.min_frequency
    }

    /// Number of decay passes run since construction.
    #[inline]
    pub(crate) fn decay_passes(&self) -> u64 {
        self.decay_passes
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.index.get(key)?;
        self.nodes.get(id).map(Node::value)
    }

    #[cfg(test)]
    pub(crate) fn frequency_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.index.get(key)?;
        self.nodes.get(id).map(Node::access_count)
    }

    /// Accesses `key`, moving it one bucket up.
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.index.get(key)?;
        self.touch(id);
        self.maybe_decay();
        self.nodes.get(id).map(Node::value)
    }

    /// Inserts a new key into bucket 1, or accesses and updates an existing
    /// one. Returns the entry evicted to make room, if any.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&id) = self.index.get(&key) {
            self.touch(id);
            if let Some(node) = self.nodes.get_mut(id) {
                node.set_value(value);
            }
            self.maybe_decay();
            return None;
        }

        if self.capacity == 0 {
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let bucket = self.buckets.entry(1).or_default();
        let id = self.nodes.push_back(bucket, Node::new(key.clone(), value));
        self.index.insert(key, id);
        self.min_frequency = 1;
        self.total_accesses = self.total_accesses.saturating_add(1);
        self.maybe_decay();
        evicted
    }

    /// Removes `key` without recording a ghost.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.index.remove(key)?;
        let node = self.detach(id)?;
        self.refresh_min_frequency();
        Some(node.into_parts())
    }

    pub(crate) fn check_ghost<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.ghost.contains(key)
    }

    pub(crate) fn remove_from_ghost<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.ghost.remove(key)
    }

    pub(crate) fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    /// Shrinks the main capacity by one, evicting first if the store is full.
    pub(crate) fn decrease_capacity(&mut self) -> Option<(K, V)> {
        if self.capacity == 0 {
            return None;
        }
        let evicted = if self.index.len() >= self.capacity {
            self.evict()
        } else {
            None
        };
        self.capacity -= 1;
        evicted
    }

    /// Evicts the oldest entry of the lowest bucket into the ghost list.
    fn evict(&mut self) -> Option<(K, V)> {
        let id = self.buckets.get(&self.min_frequency)?.front()?;
        let node = self.detach(id)?;
        let (key, value) = node.into_parts();
        self.index.remove(&key);
        self.ghost.record(key.clone());
        self.refresh_min_frequency();
        Some((key, value))
    }

    /// Unlinks `id` from its bucket and frees it.
    fn detach(&mut self, id: NodeId) -> Option<Node<K, V>> {
        let count = self.nodes.get(id)?.access_count();
        let bucket = self.buckets.get_mut(&count)?;
        let node = self.nodes.remove(bucket, id)?;
        if bucket.is_empty() {
            self.buckets.remove(&count);
        }
        self.total_accesses = self.total_accesses.saturating_sub(count);
        Some(node)
    }

    /// Records one access on `id` and splices it into the next bucket.
    fn touch(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let old = node.access_count();
        let new = node.record_access();
        self.total_accesses = self.total_accesses.saturating_add(1);

        if let Some(bucket) = self.buckets.get_mut(&old) {
            self.nodes.unlink(bucket, id);
            if bucket.is_empty() {
                self.buckets.remove(&old);
                if old == self.min_frequency {
                    self.min_frequency = new;
                }
            }
        }
        let bucket = self.buckets.entry(new).or_default();
        self.nodes.link_back(bucket, id);
    }

    fn refresh_min_frequency(&mut self) {
        self.min_frequency = self.buckets.keys().next().copied().unwrap_or(1);
    }

    /// Runs a decay pass if the average access count is above the maximum.
    fn maybe_decay(&mut self) {
        let Some(max) = self.max_average_frequency else {
            return;
        };
        let resident = self.index.len();
        if resident == 0 || self.total_accesses / resident <= max.get() {
            return;
        }

        let amount = (max.get() / 2).max(1);
        let old_buckets = mem::take(&mut self.buckets);
        let mut total = 0usize;
        for links in old_buckets.into_values() {
            let ids: Vec<NodeId> = self.nodes.iter(&links).map(|(id, _)| id).collect();
            for id in ids {
                let Some(node) = self.nodes.get_mut(id) else {
                    continue;
                };
                let count = node.decay(amount);
                total = total.saturating_add(count);
                let bucket = self.buckets.entry(count).or_default();
                self.nodes.link_back(bucket, id);
            }
        }

        debug!(
            resident,
            amount,
            before = self.total_accesses,
            after = total,
            "frequency decay pass"
        );
        self.total_accesses = total;
        self.decay_passes += 1;
        self.refresh_min_frequency();
    }

    /// Resident keys in eviction order: lowest bucket first, oldest first.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.buckets
            .values()
            .flat_map(move |bucket| self.nodes.iter(bucket).map(|(_, node)| node.key()))
    }

    pub(crate) fn ghost_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.ghost.keys()
    }

    /// Drops all entries and ghosts and resets the main capacity.
    pub(crate) fn clear(&mut self, capacity: usize) {
        self.nodes.clear();
        self.buckets.clear();
        self.index.clear();
        self.ghost.clear();
        self.min_frequency = 1;
        self.total_accesses = 0;
        self.capacity = capacity;
    }

    /// Checks bucket bookkeeping against the index. The error names the
    /// first mismatch found.
    pub(crate) fn check_consistency(&self) -> Result<(), &'static str> {
        let expected_min = self.buckets.keys().next().copied().unwrap_or(1);
        if self.min_frequency != expected_min {
            return Err("min_frequency is not the lowest non-empty bucket");
        }
        let mut linked = 0usize;
        let mut total = 0usize;
        for (&count, bucket) in &self.buckets {
            if bucket.is_empty() {
                return Err("empty frequency bucket was not released");
            }
            for (_, node) in self.nodes.iter(bucket) {
                if node.access_count() != count {
                    return Err("node sits in the wrong frequency bucket");
                }
                if !self.index.contains_key(node.key()) {
                    return Err("bucket node missing from the frequency index");
                }
                linked += 1;
                total = total.saturating_add(count);
            }
        }
        if linked != self.index.len() || self.nodes.len() != self.index.len() {
            return Err("frequency index and buckets disagree on size");
        }
        if total != self.total_accesses {
            return Err("total access count drifted");
        }
        if self.index.len() > self.capacity {
            return Err("frequency store exceeds its capacity");
        }
        Ok(())
    }
}

impl<K, V, S> fmt::Debug for FrequencyStore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyStore")
            .field("capacity", &self.capacity)
            .field("len", &self.nodes.len())
            .field("min_frequency", &self.min_frequency)
            .field("buckets", &self.buckets.len())
            .field("ghost", &self.ghost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> FrequencyStore<i32, &'static str> {
        FrequencyStore::with_hasher(capacity, capacity, None, DefaultHashBuilder::default())
    }

    fn decaying(capacity: usize, max: usize) -> FrequencyStore<i32, &'static str> {
        FrequencyStore::with_hasher(
            capacity,
            capacity,
            NonZeroUsize::new(max),
            DefaultHashBuilder::default(),
        )
    }

    #[test]
    fn test_evicts_lowest_frequency() {
        let mut store = store(2);
        store.put(1, "a");
        store.put(2, "b");
        assert_eq!(store.get(&1), Some(&"a"));
        assert_eq!(store.put(3, "c"), Some((2, "b")));
        assert!(store.contains(&1));
        assert!(store.contains(&3));
        assert!(store.check_ghost(&2));
        assert_eq!(store.check_consistency(), Ok(()));
    }

    #[test]
    fn test_ties_evict_oldest_first() {
        let mut store = store(2);
        store.put(1, "a");
        store.put(2, "b");
        assert_eq!(store.put(3, "c"), Some((1, "a")));
        assert_eq!(store.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_min_frequency_tracks_lowest_bucket() {
        let mut store = store(3);
        assert_eq!(store.min_frequency(), 1);
        store.put(1, "a");
        store.get(&1);
        assert_eq!(store.min_frequency(), 2);
        store.get(&1);
        assert_eq!(store.min_frequency(), 3);
        store.put(2, "b");
        assert_eq!(store.min_frequency(), 1);
        store.remove(&2);
        assert_eq!(store.min_frequency(), 3);
        store.remove(&1);
        assert_eq!(store.min_frequency(), 1);
        assert_eq!(store.check_consistency(), Ok(()));
    }

    #[test]
    fn test_min_frequency_after_eviction_skips_gaps() {
        let mut store = store(2);
        store.put(1, "a");
        for _ in 0..4 {
            store.get(&1);
        }
        store.put(2, "b");
        store.put(3, "c");
        assert!(!store.contains(&2));
        assert_eq!(store.min_frequency(), 1);
        store.remove(&3);
        assert_eq!(store.min_frequency(), 5);
        assert_eq!(store.check_consistency(), Ok(()));
    }

    #[test]
    fn test_put_existing_counts_as_access() {
        let mut store = store(2);
        store.put(1, "a");
        assert_eq!(store.put(1, "z"), None);
        assert_eq!(store.frequency_of(&1), Some(2));
        assert_eq!(store.peek(&1), Some(&"z"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_decrease_capacity() {
        let mut store = store(1);
        store.put(1, "a");
        assert_eq!(store.decrease_capacity(), Some((1, "a")));
        assert_eq!(store.capacity(), 0);
        assert_eq!(store.decrease_capacity(), None);
        assert_eq!(store.capacity(), 0);
        assert_eq!(store.put(2, "b"), None);
        assert!(!store.contains(&2));
        store.increase_capacity();
        store.put(2, "b");
        assert!(store.contains(&2));
    }

    #[test]
    fn test_ghost_removal() {
        let mut store = store(1);
        store.put(1, "a");
        store.put(2, "b");
        assert!(store.check_ghost(&1));
        assert!(store.remove_from_ghost(&1));
        assert!(!store.check_ghost(&1));
        assert_eq!(store.ghost_len(), 0);
        assert_eq!(store.ghost_capacity(), 1);
    }

    #[test]
    fn test_decay_lowers_counts_and_keeps_order() {
        let mut store = decaying(3, 4);
        store.put(1, "a");
        store.put(2, "b");
        for _ in 0..6 {
            store.get(&1);
        }
        for _ in 0..6 {
            store.get(&2);
        }
        // Averages of 5 trigger a pass that lowers every count by 2.
        assert_eq!(store.decay_passes(), 2);
        assert!(store.frequency_of(&1).unwrap_or(0) <= 5);
        assert_eq!(store.check_consistency(), Ok(()));
        let avg = (store.frequency_of(&1).unwrap() + store.frequency_of(&2).unwrap()) / 2;
        assert!(avg <= 4);
    }

    #[test]
    fn test_decay_floors_at_one() {
        let mut store = decaying(2, 1);
        store.put(1, "a");
        store.put(2, "b");
        store.get(&1);
        store.get(&1);
        assert!(store.decay_passes() >= 1);
        assert!(store.frequency_of(&2).unwrap() >= 1);
        assert_eq!(store.check_consistency(), Ok(()));
    }

    #[test]
    fn test_no_decay_without_limit() {
        let mut store = store(1);
        store.put(1, "a");
        for _ in 0..100 {
            store.get(&1);
        }
        assert_eq!(store.decay_passes(), 0);
        assert_eq!(store.frequency_of(&1), Some(101));
    }

    #[test]
    fn test_clear() {
        let mut store = store(2);
        store.put(1, "a");
        store.get(&1);
        store.clear(0);
        assert_eq!(store.len(), 0);
        assert_eq!(store.capacity(), 0);
        assert_eq!(store.min_frequency(), 1);
        assert_eq!(store.check_consistency(), Ok(()));
    }
}
