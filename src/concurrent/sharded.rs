//! Hash-sharded cache wrapper.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                        ShardedCache<C, S>                            │
//! │                                                                      │
//! │  hash(key) % N  ──▶  Segment Selection                               │
//! │                                                                      │
//! │  ┌──────────────┐ ┌──────────────┐     ┌──────────────┐              │
//! │  │  Segment 0   │ │  Segment 1   │ ... │  Segment N-1 │              │
//! │  │  ┌────────┐  │ │  ┌────────┐  │     │  ┌────────┐  │              │
//! │  │  │ Mutex  │  │ │  │ Mutex  │  │     │  │ Mutex  │  │              │
//! │  │  └────┬───┘  │ │  └────┬───┘  │     │  └────┬───┘  │              │
//! │  │  ┌────▼───┐  │ │  ┌────▼───┐  │     │  ┌────▼───┐  │              │
//! │  │  │   C    │  │ │  │   C    │  │     │  │   C    │  │              │
//! │  │  └────────┘  │ │  └────────┘  │     │  └────────┘  │              │
//! │  └──────────────┘ └──────────────┘     └──────────────┘              │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Eviction order and, for ARC, the capacity split are per segment. A hot
//! segment adapts on its own while the others keep their state.

use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::BTreeMap;

use tracing::warn;

use crate::arc::ArcCache;
use crate::config::{
    default_segment_count, ArcCacheConfig, ConcurrentArcCacheConfig, ConcurrentCacheConfig,
    ConcurrentLfuCacheConfig, ConcurrentLruCacheConfig, LfuCacheConfig, LruCacheConfig,
};
use crate::error::{ConfigError, InvariantError};
use crate::lfu::LfuCache;
use crate::lru::LruCache;
use crate::metrics::{merge_metrics, CacheMetrics};
use crate::policy::CachePolicy;
use crate::DefaultHashBuilder;

/// Routes every key to one of several independent caches.
///
/// # Type Parameters
///
/// - `C`: segment cache type, usually one implementing [`CachePolicy`].
/// - `S`: hash builder used to pick a segment.
pub struct ShardedCache<C, S = DefaultHashBuilder> {
    segments: Box<[C]>,
    hash_builder: S,
}

/// A sharded ARC cache. Each segment adapts its own capacity split.
pub type ConcurrentArcCache<K, V, S = DefaultHashBuilder> = ShardedCache<ArcCache<K, V>, S>;

/// A sharded LRU cache.
pub type ConcurrentLruCache<K, V, S = DefaultHashBuilder> = ShardedCache<LruCache<K, V>, S>;

/// A sharded LFU cache. Aging runs per segment.
pub type ConcurrentLfuCache<K, V, S = DefaultHashBuilder> = ShardedCache<LfuCache<K, V>, S>;

/// Splits `total` over at most `segments` shards, each holding at least one
/// entry, with the remainder going to the first shards.
fn segment_capacities(total: usize, segments: usize) -> Vec<usize> {
    let count = segments.clamp(1, total.max(1));
    if count != segments {
        warn!(
            requested = segments,
            used = count,
            capacity = total,
            "segment count clamped"
        );
    }
    let base = total / count;
    let remainder = total % count;
    (0..count)
        .map(|i| base + usize::from(i < remainder))
        .collect()
}

/// Segment count for the `new` constructors: one per core, never more than
/// the capacity allows.
fn default_segments_for(capacity: usize) -> usize {
    default_segment_count().min(capacity.max(1))
}

impl<C, S> ShardedCache<C, S> {
    /// Builds a sharded cache from pre-built segments.
    ///
    /// Fails with [`ConfigError::ZeroSegments`] if `segments` is empty.
    pub fn from_segments(segments: Vec<C>, hash_builder: S) -> Result<Self, ConfigError> {
        if segments.is_empty() {
            return Err(ConfigError::ZeroSegments);
        }
        Ok(ShardedCache {
            segments: segments.into_boxed_slice(),
            hash_builder,
        })
    }

    /// Returns the number of segments in the cache.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The segments in routing order.
    pub fn segments(&self) -> &[C] {
        &self.segments
    }
}

impl<C, S: BuildHasher> ShardedCache<C, S> {
    /// Returns the segment index for the given key.
    #[inline]
    pub fn segment_index<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        (self.hash_builder.hash_one(key) as usize) % self.segments.len()
    }

    #[inline]
    fn segment<Q>(&self, key: &Q) -> &C
    where
        Q: ?Sized + Hash,
    {
        &self.segments[self.segment_index(key)]
    }
}

impl<K: Hash + Eq + Clone, V> ShardedCache<ArcCache<K, V>, DefaultHashBuilder> {
    /// Creates a sharded ARC cache with one segment per available core.
    pub fn new(capacity: usize, transform_threshold: usize) -> Self {
        Self::init(
            ConcurrentCacheConfig {
                base: ArcCacheConfig::new(capacity, transform_threshold),
                segments: default_segments_for(capacity),
            },
            None,
        )
    }

    /// Creates a sharded ARC cache, splitting the total capacity evenly.
    ///
    /// The segment count is clamped to `1..=capacity`. Each segment starts
    /// with its whole share in the recency tier.
    pub fn init(config: ConcurrentArcCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        let segments = segment_capacities(config.base.capacity, config.segments)
            .into_iter()
            .map(|capacity| {
                // Segments hash with their own builders so keys of one shard
                // do not share low hash bits inside it.
                ArcCache::init(
                    ArcCacheConfig {
                        capacity,
                        ..config.base
                    },
                    None,
                )
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        ShardedCache {
            segments,
            hash_builder: hasher.unwrap_or_default(),
        }
    }

    /// Like [`init`](Self::init) but rejects invalid configs.
    pub fn try_init(
        config: ConcurrentArcCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::init(config, hasher))
    }
}

impl<K: Hash + Eq + Clone, V> ShardedCache<LruCache<K, V>, DefaultHashBuilder> {
    /// Creates a sharded LRU cache with one segment per available core.
    pub fn new(capacity: usize) -> Self {
        Self::init(
            ConcurrentCacheConfig {
                base: LruCacheConfig { capacity },
                segments: default_segments_for(capacity),
            },
            None,
        )
    }

    /// Creates a sharded LRU cache, splitting the total capacity evenly.
    pub fn init(config: ConcurrentLruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        let segments = segment_capacities(config.base.capacity, config.segments)
            .into_iter()
            .map(|capacity| LruCache::init(LruCacheConfig { capacity }, None))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        ShardedCache {
            segments,
            hash_builder: hasher.unwrap_or_default(),
        }
    }

    /// Like [`init`](Self::init) but rejects invalid configs.
    pub fn try_init(
        config: ConcurrentLruCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::init(config, hasher))
    }
}

impl<K: Hash + Eq + Clone, V> ShardedCache<LfuCache<K, V>, DefaultHashBuilder> {
    /// Creates a sharded LFU cache without aging, one segment per core.
    pub fn new(capacity: usize) -> Self {
        Self::init(
            ConcurrentCacheConfig {
                base: LfuCacheConfig::new(capacity),
                segments: default_segments_for(capacity),
            },
            None,
        )
    }

    /// Creates a sharded LFU cache, splitting the total capacity evenly.
    /// Every segment uses the same aging limit.
    pub fn init(config: ConcurrentLfuCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        let segments = segment_capacities(config.base.capacity, config.segments)
            .into_iter()
            .map(|capacity| {
                LfuCache::init(
                    LfuCacheConfig {
                        capacity,
                        ..config.base
                    },
                    None,
                )
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        ShardedCache {
            segments,
            hash_builder: hasher.unwrap_or_default(),
        }
    }

    /// Like [`init`](Self::init) but rejects invalid configs.
    pub fn try_init(
        config: ConcurrentLfuCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::init(config, hasher))
    }
}

impl<K: Hash + Eq + Clone, V, S> ShardedCache<LfuCache<K, V>, S> {
    /// Checks every segment and reports the first violation.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segments
            .iter()
            .try_for_each(|segment| segment.check_invariants())
    }
}

impl<K: Hash + Eq + Clone, V, S> ShardedCache<ArcCache<K, V>, S> {
    /// Checks every segment and reports the first violation.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segments
            .iter()
            .try_for_each(|segment| segment.check_invariants())
    }
}

impl<K, V, C, S> CachePolicy<K, V> for ShardedCache<C, S>
where
    K: Hash,
    C: CachePolicy<K, V>,
    S: BuildHasher,
{
    fn put(&self, key: K, value: V) {
        self.segment(&key).put(key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        self.segment(key).get(key)
    }

    fn get_with<R, F>(&self, key: &K, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        self.segment(key).get_with(key, f)
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.segment(key).remove(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.segment(key).contains(key)
    }

    /// Sums segment lengths, locking one segment at a time; the total may be
    /// stale under concurrent writes.
    fn len(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    fn capacity(&self) -> usize {
        self.segments.iter().map(|s| s.capacity()).sum()
    }

    fn clear(&self) {
        for segment in self.segments.iter() {
            segment.clear();
        }
    }
}

impl<C: CacheMetrics, S> CacheMetrics for ShardedCache<C, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        let mut metrics = merge_metrics(self.segments.iter().map(CacheMetrics::metrics));
        metrics.insert("segments".to_string(), self.segments.len() as f64);
        metrics
    }

    fn algorithm_name(&self) -> &'static str {
        self.segments
            .first()
            .map_or("Sharded", CacheMetrics::algorithm_name)
    }
}

impl<C, S> fmt::Debug for ShardedCache<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedCache")
            .field("segments", &self.segments.len())
            .finish()
    }
}
