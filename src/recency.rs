//! Recency tier of the ARC cache.
//!
//! The recency store is an LRU list with a mutable main capacity and a
//! bounded ghost list of the keys it evicted. Every access bumps the entry's
//! access count; once the count reaches the transform threshold the store
//! reports that the entry should be promoted to the frequency tier. The
//! store never moves entries itself, that is the orchestrator's job.
//!
//! # Algorithm
//!
//! ```text
//!   main (MRU first)                                 ghost (newest first)
//!   ┌─────────────────────────────────────┐          ┌──────────────────┐
//!   │ [k4] ◄──► [k3] ◄──► [k2] ◄──► [k1] ─┼─ evict ─►│ k1 ◄──► k0 ...   │
//!   └─────────────────────────────────────┘          └──────────────────┘
//!     ▲ put / get move here          LRU ▲            keys only, bounded
//! ```
//!
//! - Capacity is enforced before inserting, so the main list never holds
//!   more than `capacity` entries, not even transiently.
//! - `decrease_capacity` evicts first when the list is full.
//!
//! With a ghost capacity of zero and an unreachable threshold this is a plain
//! LRU cache, which is how [`LruCache`](crate::LruCache) is built.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use crate::ghost::GhostList;
use crate::list::{Arena, Links, NodeId};
use crate::node::Node;
use crate::{DefaultHashBuilder, HashMap};

pub(crate) struct RecencyStore<K, V, S = DefaultHashBuilder> {
    capacity: usize,
    transform_threshold: usize,
    nodes: Arena<Node<K, V>>,
    main: Links,
    index: HashMap<K, NodeId, S>,
    ghost: GhostList<K, S>,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> RecencyStore<K, V, S> {
    pub(crate) fn with_hasher(
        capacity: usize,
        ghost_capacity: usize,
        transform_threshold: usize,
        hash_builder: S,
    ) -> Self {
        RecencyStore {
            capacity,
            transform_threshold,
            nodes: Arena::with_capacity(capacity),
            main: Links::new(),
            index: HashMap::with_capacity_and_hasher(capacity, hash_builder.clone()),
            ghost: GhostList::with_hasher(ghost_capacity, hash_builder),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> RecencyStore<K, V, S> {
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

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// Looks up `key` without touching recency or the access count.
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.index.get(key)?;
        self.nodes.get(id).map(Node::value)
    }

    /// Accesses `key`: bumps its count and moves it to the MRU position.
    ///
    /// The flag is `true` when the new count reaches the transform threshold.
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<(&V, bool)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = *self.index.get(key)?;
        self.nodes.move_to_front(&mut self.main, id);
        let threshold = self.transform_threshold;
        let node = self.nodes.get_mut(id)?;
        let count = node.record_access();
        Some((node.value(), count >= threshold))
    }

    /// Inserts or updates `key` and moves it to the MRU position.
    ///
    /// Updating does not count as an access. Returns the entry evicted to make
    /// room, if any; its key is now the newest ghost.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&id) = self.index.get(&key) {
            self.nodes.move_to_front(&mut self.main, id);
            if let Some(node) = self.nodes.get_mut(id) {
                node.set_value(value);
            }
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

        let id = self
            .nodes
            .push_front(&mut self.main, Node::new(key.clone(), value));
        self.index.insert(key, id);
        evicted
    }

    /// Removes `key` from the main list without recording a ghost.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.index.remove(key)?;
        self.nodes
            .remove(&mut self.main, id)
            .map(Node::into_parts)
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

    /// Records `key` as a ghost without it ever having been resident.
    pub(crate) fn record_ghost(&mut self, key: K) {
        self.ghost.record(key);
    }

    pub(crate) fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    /// Shrinks the main capacity by one, evicting first if the list is full.
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

    /// Moves the LRU entry to the ghost list and returns it.
    fn evict(&mut self) -> Option<(K, V)>
    where
        K: Clone,
    {
        let node = self.nodes.pop_back(&mut self.main)?;
        let (key, value) = node.into_parts();
        self.index.remove(&key);
        self.ghost.record(key.clone());
        Some((key, value))
    }

    /// Resident keys from most to least recently used.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.nodes.iter(&self.main).map(|(_, node)| node.key())
    }

    pub(crate) fn ghost_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.ghost.keys()
    }

    /// Drops all entries and ghosts and resets the main capacity.
    pub(crate) fn clear(&mut self, capacity: usize) {
        self.nodes.clear();
        self.main = Links::new();
        self.index.clear();
        self.ghost.clear();
        self.capacity = capacity;
    }

    /// Cross-checks the index against the list.
    pub(crate) fn is_consistent(&self) -> bool {
        self.main.len() == self.index.len()
            && self.nodes.len() == self.index.len()
            && self.index.len() <= self.capacity
            && self.ghost.len() <= self.ghost.capacity()
    }
}

impl<K, V, S> fmt::Debug for RecencyStore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyStore")
            .field("capacity", &self.capacity)
            .field("len", &self.main.len())
            .field("transform_threshold", &self.transform_threshold)
            .field("ghost", &self.ghost)
            .finish()
    }
}
