//! The capability set shared by every cache in this crate.
//!
//! All caches are internally synchronized, so every method takes `&self` and
//! a cache can be shared through an `Arc` without further wrapping. The trait
//! lets [`ShardedCache`](crate::ShardedCache) route over any of them and lets
//! benchmarks and tests drive the algorithms through one interface.

/// Operations exposed by [`ArcCache`](crate::ArcCache),
/// [`LruCache`](crate::LruCache), [`HistoryCache`](crate::HistoryCache) and
/// [`ShardedCache`](crate::ShardedCache).
pub trait CachePolicy<K, V> {
    /// Inserts or overwrites `key`. Never fails; the cache decides what to
    /// evict, or for admission-gated caches whether to keep the value at all.
    fn put(&self, key: K, value: V);

    /// Returns a clone of the cached value, taken under the cache's lock.
    fn get(&self, key: &K) -> Option<V>;

    /// Like [`get`](CachePolicy::get) but falls back to `V::default()`.
    fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.get(key).unwrap_or_default()
    }

    /// Calls `f` with a reference to the cached value while the lock is held.
    fn get_with<R, F>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
        Self: Sized;

    /// Removes `key` without recording it as evicted.
    fn remove(&self, key: &K) -> Option<V>;

    /// Returns `true` if `key` is resident. Does not count as an access.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries.
    fn capacity(&self) -> usize;

    /// Drops every entry and restores the initial state.
    fn clear(&self);
}
