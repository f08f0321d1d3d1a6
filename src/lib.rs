#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## How the ARC Cache Is Laid Out
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                            ArcCache<K, V>                                │
//! │                                                                          │
//! │   total capacity C = recency capacity R + frequency capacity F           │
//! │                                                                          │
//! │   ┌────────────────────────────┐     ┌────────────────────────────┐      │
//! │   │      Recency tier (R)      │     │     Frequency tier (F)     │      │
//! │   │  MRU ◀──────────────▶ LRU  │     │  buckets by access count   │      │
//! │   │  new keys land here        │────▶│  evicts from lowest count  │      │
//! │   │  count >= threshold moves  │     │  FIFO within a bucket      │      │
//! │   └─────────────┬──────────────┘     └─────────────┬──────────────┘      │
//! │                 │ evicted keys                      │ evicted keys       │
//! │                 ▼                                   ▼                    │
//! │   ┌────────────────────────────┐     ┌────────────────────────────┐      │
//! │   │  Recency ghost (keys only) │     │ Frequency ghost (keys only)│      │
//! │   │  hit: move 1 unit F ▶ R    │     │  hit: move 1 unit R ▶ F    │      │
//! │   └────────────────────────────┘     └────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A new cache gives the whole capacity to the recency tier. Every promotion
//! and every frequency ghost hit moves one unit of capacity toward the
//! frequency tier, every recency ghost hit moves one unit back. The two
//! capacities always sum to the configured total.
//!
//! ## Quick Reference
//!
//! | Cache | Description | Best Use Case |
//! |-------|-------------|---------------|
//! | [`ArcCache`] | Adaptive recency/frequency split | Workloads whose mix changes over time |
//! | [`LruCache`] | Least Recently Used | Recency-driven access, baseline |
//! | [`LfuCache`] | Least Frequently Used, optional aging | Stable popularity, baseline |
//! | [`HistoryCache`] | LRU with history-gated admission | Keeping one-hit wonders out |
//! | [`ShardedCache`] | Hash-partitioned segments | Many threads on one cache |
//!
//! ## Code Examples
//!
//! ### ARC
//!
//! ```rust
//! use arc_cache::ArcCache;
//!
//! let cache = ArcCache::new(3, 2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//!
//! // The second access reaches the threshold: "a" moves to the frequency tier
//! // and takes one unit of capacity with it.
//! assert_eq!(cache.get(&"a"), Some(1));
//! assert_eq!(cache.recency_capacity(), 2);
//! assert_eq!(cache.frequency_capacity(), 1);
//! assert!(cache.check_invariants().is_ok());
//! ```
//!
//! ### LRU
//!
//! ```rust
//! use arc_cache::LruCache;
//!
//! let cache = LruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");      // "a" becomes most recently used
//! cache.put("c", 3);    // "b" evicted (least recently used)
//! assert!(cache.get(&"b").is_none());
//! ```
//!
//! ### LFU
//!
//! ```rust
//! use arc_cache::LfuCache;
//!
//! let cache = LfuCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");      // "a" now has the higher count
//! cache.put("c", 3);    // "b" evicted (lowest count)
//! assert!(cache.get(&"b").is_none());
//! ```
//!
//! ### History-gated LRU
//!
//! ```rust
//! use arc_cache::HistoryCache;
//!
//! let cache = HistoryCache::new(2, 2);
//! cache.put("a", 1);          // first sighting, only remembered
//! assert!(!cache.contains(&"a"));
//! cache.put("a", 1);          // second sighting, admitted
//! assert_eq!(cache.get(&"a"), Some(1));
//! ```
//!
//! ## Policies Behind One Trait
//!
//! ```rust
//! use arc_cache::{ArcCache, CachePolicy, LruCache};
//!
//! fn warm<C: CachePolicy<u32, u32>>(cache: &C) {
//!     for i in 0..10 {
//!         cache.put(i, i * 10);
//!     }
//! }
//!
//! let arc = ArcCache::new(8, 2);
//! let lru = LruCache::new(8);
//! warm(&arc);
//! warm(&lru);
//! assert_eq!(arc.len(), lru.len());
//! ```
//!
//! ## Modules
//!
//! - [`arc`]: Adaptive Replacement Cache
//! - [`lru`]: Least Recently Used cache
//! - [`lfu`]: Least Frequently Used cache with optional aging
//! - [`history`]: LRU cache with history-gated admission
//! - [`concurrent`]: Hash-sharded caches for heavy multi-threaded use
//! - [`config`]: Configuration structures for all caches
//! - [`error`]: Configuration and invariant errors
//! - [`metrics`]: Metrics collection for cache performance monitoring
//! - [`policy`]: The [`CachePolicy`] trait shared by every cache

#[cfg(test)]
extern crate scoped_threadpool;

/// Index-based doubly linked lists over a slot arena.
///
/// **Note**: This module is internal infrastructure. Handles are plain
/// indices, so a stale handle is a logic error, never memory unsafety.
pub(crate) mod list;

/// Cache entry with an access counter.
pub(crate) mod node;

/// Bounded key-only history of evicted entries.
pub(crate) mod ghost;

/// Recency tier: LRU order with promotion signalling.
pub(crate) mod recency;

/// Frequency tier: entries bucketed by access count.
pub(crate) mod frequency;

/// Cache configuration structures.
pub mod config;

/// Configuration and invariant errors.
pub mod error;

/// The trait shared by every cache policy.
pub mod policy;

/// Adaptive Replacement Cache implementation.
///
/// Balances a recency tier against a frequency tier, shifting capacity
/// between them as ghost hits reveal which tier was evicting too eagerly.
pub mod arc;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least recently used items when
/// the capacity is reached.
pub mod lru;

/// Least Frequently Used (LFU) cache implementation.
///
/// Evicts the entry with the lowest access count, oldest first among ties,
/// and can age counts so that past popularity fades.
pub mod lfu;

/// LRU cache that admits a key only after repeated sightings.
pub mod history;

/// Cache metrics system.
///
/// Provides a flexible metrics collection and reporting system for all cache algorithms.
/// Each algorithm can track algorithm-specific metrics while implementing a common interface.
pub mod metrics;

/// Concurrent cache implementations.
///
/// Partitions the key space across multiple caches, each protected by its
/// own lock.
pub mod concurrent;

#[cfg(feature = "hashbrown")]
pub use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
pub(crate) use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
pub(crate) use std::collections::HashMap;

// Re-export cache types
pub use arc::{ArcCache, CapacitySplit, Residency};
pub use history::HistoryCache;
pub use lfu::LfuCache;
pub use lru::LruCache;

pub use concurrent::{ConcurrentArcCache, ConcurrentLfuCache, ConcurrentLruCache, ShardedCache};
pub use error::{ConfigError, InvariantError};
pub use metrics::CacheMetrics;
pub use policy::CachePolicy;
