//! Concurrent Cache Implementations
//!
//! Every cache in this crate is already safe to share: it keeps its state
//! behind one `parking_lot::Mutex`. Under many threads that one lock becomes
//! the bottleneck, so this module provides [`ShardedCache`], which partitions
//! the key space over several independent caches:
//!
//! - the key space is partitioned across segments by `hash(key) % segments`;
//! - each segment is a complete cache with its own lock and its own policy
//!   state (for ARC, its own capacity split and ghost lists);
//! - there is no cross-segment coordination.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! Every `get()` mutates the cache: LRU moves the entry, ARC bumps its access
//! count and may promote it. A read lock would buy nothing, and
//! `parking_lot::Mutex` is the cheaper primitive.
//!
//! # Available Concurrent Caches
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ConcurrentArcCache`] | ARC segments |
//! | [`ConcurrentLruCache`] | LRU segments |
//! | [`ConcurrentLfuCache`] | LFU segments |
//! | [`ShardedCache`] | Any [`CachePolicy`](crate::CachePolicy) segments |
//!
//! # Example
//!
//! ```
//! use arc_cache::config::{ArcCacheConfig, ConcurrentArcCacheConfig, ConcurrentCacheConfig};
//! use arc_cache::{CachePolicy, ConcurrentArcCache};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let config: ConcurrentArcCacheConfig = ConcurrentCacheConfig {
//!     base: ArcCacheConfig::new(1000, 2),
//!     segments: 8,
//! };
//! let cache: Arc<ConcurrentArcCache<String, usize>> = Arc::new(ConcurrentArcCache::init(config, None));
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             let key = format!("key_{}_{}", t, i);
//!             cache.put(key.clone(), i);
//!             let _ = cache.get(&key);
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert!(cache.len() <= 1000);
//! ```

mod sharded;

pub use self::sharded::{ConcurrentArcCache, ConcurrentLfuCache, ConcurrentLruCache, ShardedCache};
