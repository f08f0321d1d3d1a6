//! Cache entry record shared by both ARC tiers.
//!
//! A [`Node`] holds the key, the value and the number of times the entry has
//! been accessed while resident in its current tier. Nodes are stored in an
//! [`Arena`](crate::list::Arena) and linked by handle; the store whose index
//! lists a handle owns the node. When a node is evicted to a ghost list only
//! its key survives.

use core::fmt;

pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    access_count: usize,
}

impl<K, V> Node<K, V> {
    /// A freshly inserted entry counts as accessed once.
    pub(crate) fn new(key: K, value: V) -> Self {
        Node {
            key,
            value,
            access_count: 1,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn set_value(&mut self, value: V) {
        self.value = value;
    }

    #[inline]
    pub(crate) fn access_count(&self) -> usize {
        self.access_count
    }

    /// Records one access and returns the new count.
    #[inline]
    pub(crate) fn record_access(&mut self) -> usize {
        self.access_count = self.access_count.saturating_add(1);
        self.access_count
    }

    /// Lowers the count by `amount`, never below 1, and returns the new count.
    pub(crate) fn decay(&mut self, amount: usize) -> usize {
        self.access_count = self.access_count.saturating_sub(amount).max(1);
        self.access_count
    }

    pub(crate) fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("access_count", &self.access_count)
            .finish()
    }
}
