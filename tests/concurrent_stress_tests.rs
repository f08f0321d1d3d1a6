//! Stress Tests for Shared and Sharded Caches
//!
//! These tests verify thread safety and invariant preservation under high
//! contention, both for a single `ArcCache` shared through an `Arc` and for
//! the sharded wrappers.

use arc_cache::config::{
    ArcCacheConfig, ConcurrentArcCacheConfig, ConcurrentCacheConfig, ConcurrentLruCacheConfig,
    LfuCacheConfig, LruCacheConfig,
};
use arc_cache::{ArcCache, CachePolicy, ConcurrentArcCache, ConcurrentLfuCache, ConcurrentLruCache};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

const NUM_THREADS: usize = 16;
const OPS_PER_THREAD: usize = 10_000;

fn arc_config(capacity: usize, segments: usize) -> ConcurrentArcCacheConfig {
    ConcurrentCacheConfig {
        base: ArcCacheConfig::new(capacity, 2),
        segments,
    }
}

fn lru_config(capacity: usize, segments: usize) -> ConcurrentLruCacheConfig {
    ConcurrentCacheConfig {
        base: LruCacheConfig { capacity },
        segments,
    }
}

/// Deterministic per-thread key stream mixing a hot set with a long tail.
fn key_for(thread: usize, i: usize) -> usize {
    let x = (thread * 7919 + i * 104_729) % 10_007;
    if x % 4 == 0 {
        x % 16
    } else {
        x
    }
}

#[test]
fn stress_single_arc_high_contention() {
    let cache: Arc<ArcCache<usize, usize>> = Arc::new(ArcCache::new(64, 2));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = key_for(t, i);
                if i % 3 == 0 {
                    cache.put(key, i);
                } else {
                    let _ = cache.get(&key);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 64);
    assert_eq!(cache.recency_capacity() + cache.frequency_capacity(), 64);
    assert!(cache.check_invariants().is_ok());
}

#[test]
fn stress_single_arc_same_key_writes() {
    let cache: Arc<ArcCache<usize, usize>> = Arc::new(ArcCache::new(4, 2));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                cache.put(0, t * 1000 + i);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // Every write is whole: the value is one some thread actually wrote last.
    let value = cache.get(&0).expect("key 0 should be resident");
    assert_eq!(value % 1000, 999);
    assert_eq!(cache.len(), 1);
    assert!(cache.check_invariants().is_ok());
}

#[test]
fn stress_sharded_arc_high_contention() {
    let cache: Arc<ConcurrentArcCache<usize, usize>> =
        Arc::new(ConcurrentArcCache::init(arc_config(256, 16), None));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = key_for(t, i);
                match i % 4 {
                    0 => cache.put(key, i),
                    1 => {
                        let _ = cache.remove(&key);
                    }
                    _ => {
                        let _ = cache.get(&key);
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 256);
    assert_eq!(cache.capacity(), 256);
    assert!(cache.check_invariants().is_ok());
}

/// Test with various segment counts
#[test]
fn stress_segment_counts() {
    for segments in [1, 2, 4, 8, 16, 32] {
        let cache: Arc<ConcurrentArcCache<usize, usize>> =
            Arc::new(ConcurrentArcCache::init(arc_config(1000, segments), None));

        let mut handles = Vec::new();
        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..1000 {
                    cache.put(t * 1000 + i, i);
                    let _ = cache.get(&(t * 1000 + i));
                }
            }));
        }

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(cache.segment_count(), segments);
        assert!(cache.len() <= 1000);
        assert!(cache.check_invariants().is_ok());
    }
}

/// Test edge case: empty cache operations
#[test]
fn stress_empty_cache() {
    let cache: Arc<ConcurrentArcCache<usize, usize>> =
        Arc::new(ConcurrentArcCache::init(arc_config(100, 16), None));

    let mut handles = Vec::new();
    for _ in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                assert!(cache.get(&i).is_none());
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.is_empty());
}

/// Test concurrent removes
#[test]
fn stress_concurrent_removes() {
    let cache: Arc<ConcurrentLruCache<usize, usize>> =
        Arc::new(ConcurrentLruCache::init(lru_config(1000, 16), None));

    for i in 0..1000 {
        cache.put(i, i);
    }
    let resident = cache.len();

    let removed_count = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();

    for _ in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        let removed = Arc::clone(&removed_count);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                if cache.remove(&i).is_some() {
                    removed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // Each resident entry is removed exactly once.
    assert_eq!(removed_count.load(Ordering::Relaxed), resident);
    assert!(cache.is_empty());
}

/// Test concurrent clear operations
#[test]
fn stress_concurrent_clear() {
    let cache: Arc<ConcurrentArcCache<usize, usize>> =
        Arc::new(ConcurrentArcCache::init(arc_config(1000, 16), None));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                cache.put(t * 1000 + i, i);
                let _ = cache.get(&(t * 1000 + i));
                if i % 100 == 0 {
                    cache.clear();
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 1000);
    assert!(cache.check_invariants().is_ok());
}

#[test]
fn stress_lru_capacity_limits() {
    let capacity = 100;
    let cache: Arc<ConcurrentLruCache<usize, usize>> =
        Arc::new(ConcurrentLruCache::init(lru_config(capacity, 16), None));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                cache.put(t * OPS_PER_THREAD + i, i);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= capacity);
}

#[test]
fn stress_sharded_lfu_with_aging() {
    let capacity = 128;
    let config = ConcurrentCacheConfig {
        base: LfuCacheConfig::new(capacity)
            .with_max_average_frequency(NonZeroUsize::new(8).unwrap()),
        segments: 8,
    };
    let cache: Arc<ConcurrentLfuCache<usize, usize>> =
        Arc::new(ConcurrentLfuCache::init(config, None));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = key_for(t, i);
                if i % 2 == 0 {
                    cache.put(key, i);
                } else {
                    let _ = cache.get(&key);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= capacity);
    assert_eq!(cache.capacity(), capacity);
    assert!(cache.check_invariants().is_ok());
}
