//! Bounded list of recently evicted keys.
//!
//! Each ARC tier keeps a ghost list of the keys it evicted most recently,
//! without their values. A later `put` of a ghosted key is evidence that the
//! tier was too small, which drives the capacity split.
//!
//! ```text
//!   index: HashMap<K, NodeId>           keys: Arena<K> + Links
//!   ┌─────────┬─────────┐               head ─► [C] ◄──► [B] ◄──► [A] ◄── tail
//!   │  key A  │  id_0   │             newest ghost              oldest ghost
//!   │  key B  │  id_1   │                                       (dropped first)
//!   └─────────┴─────────┘
//! ```

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use crate::list::{Arena, Links, NodeId};
use crate::{DefaultHashBuilder, HashMap};

pub(crate) struct GhostList<K, S = DefaultHashBuilder> {
    capacity: usize,
    keys: Arena<K>,
    order: Links,
    index: HashMap<K, NodeId, S>,
}

impl<K: Hash + Eq + Clone, S: BuildHasher> GhostList<K, S> {
    pub(crate) fn with_hasher(capacity: usize, hash_builder: S) -> Self {
        GhostList {
            capacity,
            keys: Arena::with_capacity(capacity),
            order: Links::new(),
            index: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// Records `key` as the newest ghost, dropping the oldest one when full.
    pub(crate) fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }

        if let Some(&id) = self.index.get(&key) {
            self.keys.move_to_front(&mut self.order, id);
            return;
        }

        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.keys.pop_back(&mut self.order) {
                self.index.remove(&oldest);
            }
        }

        let id = self.keys.push_front(&mut self.order, key.clone());
        self.index.insert(key, id);
    }

    /// Removes `key`; returns `true` if it was present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.index.remove(key) {
            Some(id) => {
                self.keys.remove(&mut self.order, id);
                true
            }
            None => false,
        }
    }

    /// Ghost keys from newest to oldest.
    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.keys.iter(&self.order).map(|(_, key)| key)
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
        self.order = Links::new();
        self.index.clear();
    }
}

impl<K, S> fmt::Debug for GhostList<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhostList")
            .field("capacity", &self.capacity)
            .field("len", &self.order.len())
            .finish()
    }
}
