//! Property Tests for the ARC Cache
//!
//! Random operation sequences against `ArcCache`, checking the structural
//! invariants after every step and comparing resident values against a
//! simple model of the last write per key.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use arc_cache::config::{ArcCacheConfig, ConcurrentCacheConfig, LfuCacheConfig};
use arc_cache::{ArcCache, CachePolicy, ConcurrentArcCache, LfuCache};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Operation {
    Put(u32, u32),
    Get(u32),
    Remove(u32),
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => (0u32..40, 0u32..1000).prop_map(|(k, v)| Operation::Put(k, v)),
        3 => (0u32..40).prop_map(Operation::Get),
        1 => (0u32..40).prop_map(Operation::Remove),
    ]
}

fn apply(cache: &ArcCache<u32, u32>, model: &mut HashMap<u32, u32>, op: Operation) {
    match op {
        Operation::Put(k, v) => {
            cache.put(k, v);
            model.insert(k, v);
        }
        Operation::Get(k) => {
            let _ = cache.get(&k);
        }
        Operation::Remove(k) => {
            let _ = cache.remove(&k);
            model.remove(&k);
        }
    }
}

proptest! {
    /// Invariants hold after any operation sequence.
    #[test]
    fn prop_arbitrary_ops_maintain_invariants(
        capacity in 1usize..20,
        threshold in 1usize..5,
        ops in prop::collection::vec(operation_strategy(), 0..300)
    ) {
        let cache = ArcCache::new(capacity, threshold);
        let mut model = HashMap::new();
        for op in ops {
            apply(&cache, &mut model, op);
            prop_assert!(cache.check_invariants().is_ok(), "{:?}", cache.check_invariants());
            prop_assert!(cache.len() <= cache.capacity());
            prop_assert_eq!(
                cache.recency_capacity() + cache.frequency_capacity(),
                capacity
            );
        }
    }

    /// A resident key always holds the value of its latest put.
    #[test]
    fn prop_resident_values_match_last_put(
        capacity in 1usize..20,
        threshold in 1usize..5,
        ops in prop::collection::vec(operation_strategy(), 0..300)
    ) {
        let cache = ArcCache::new(capacity, threshold);
        let mut model = HashMap::new();
        for op in ops {
            apply(&cache, &mut model, op);
        }
        for key in 0u32..40 {
            if let Some(value) = cache.peek(&key) {
                prop_assert_eq!(Some(&value), model.get(&key));
            }
        }
    }

    /// Repeated reads return the same value and never change the length.
    #[test]
    fn prop_repeated_gets_are_stable(
        capacity in 1usize..20,
        threshold in 1usize..5,
        ops in prop::collection::vec(operation_strategy(), 0..100),
        key in 0u32..40,
        reads in 1usize..10
    ) {
        let cache = ArcCache::new(capacity, threshold);
        let mut model = HashMap::new();
        for op in ops {
            apply(&cache, &mut model, op);
        }
        let first = cache.get(&key);
        let len = cache.len();
        for _ in 0..reads {
            prop_assert_eq!(cache.get(&key), first);
            prop_assert_eq!(cache.len(), len);
        }
    }

    /// Decay never breaks the frequency tier's bookkeeping.
    #[test]
    fn prop_decay_keeps_invariants(
        capacity in 1usize..20,
        max_average in 1usize..6,
        ops in prop::collection::vec(operation_strategy(), 0..300)
    ) {
        let config = ArcCacheConfig::new(capacity, 2)
            .with_max_average_frequency(NonZeroUsize::new(max_average).unwrap());
        let cache = ArcCache::init(config, None);
        let mut model = HashMap::new();
        for op in ops {
            apply(&cache, &mut model, op);
            prop_assert!(cache.check_invariants().is_ok(), "{:?}", cache.check_invariants());
        }
    }

    /// The LFU baseline keeps its buckets consistent with or without aging.
    #[test]
    fn prop_lfu_ops_maintain_invariants(
        capacity in 1usize..20,
        max_average in prop::option::of(1usize..6),
        ops in prop::collection::vec(operation_strategy(), 0..300)
    ) {
        let cache = LfuCache::init(
            LfuCacheConfig {
                capacity,
                max_average_frequency: max_average.and_then(NonZeroUsize::new),
            },
            None,
        );
        let mut model = HashMap::new();
        for op in ops {
            match op {
                Operation::Put(k, v) => {
                    cache.put(k, v);
                    model.insert(k, v);
                }
                Operation::Get(k) => {
                    let _ = cache.get(&k);
                }
                Operation::Remove(k) => {
                    let _ = cache.remove(&k);
                    model.remove(&k);
                }
            }
            prop_assert!(cache.check_invariants().is_ok(), "{:?}", cache.check_invariants());
            prop_assert!(cache.len() <= capacity);
        }
        for key in 0u32..40 {
            if let Some(value) = cache.peek(&key) {
                prop_assert_eq!(Some(&value), model.get(&key));
            }
        }
    }

    /// The sharded capacity is exactly the configured total.
    #[test]
    fn prop_sharded_capacity_is_total(
        capacity in 1usize..200,
        segments in 1usize..16,
        keys in prop::collection::vec(0u32..500, 0..300)
    ) {
        let cache: ConcurrentArcCache<u32, u32> = ConcurrentArcCache::init(
            ConcurrentCacheConfig {
                base: ArcCacheConfig::new(capacity, 2),
                segments,
            },
            None,
        );
        prop_assert_eq!(cache.capacity(), capacity);
        for key in keys {
            cache.put(key, key);
            let _ = cache.get(&key);
        }
        prop_assert!(cache.len() <= capacity);
        prop_assert!(cache.check_invariants().is_ok());
    }
}
