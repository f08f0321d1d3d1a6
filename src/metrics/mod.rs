//! Cache Metrics System
//!
//! Every cache reports its counters through the [`CacheMetrics`] trait as a
//! `BTreeMap<String, f64>`. BTreeMap keeps the keys in a stable order, so
//! reports from different caches or runs can be compared line by line.
//!
//! [`CoreCacheMetrics`] holds the counters every algorithm tracks;
//! algorithm-specific structs such as [`ArcCacheMetrics`] embed it and add
//! their own keys.

use std::collections::BTreeMap;

pub mod arc;

pub use arc::ArcCacheMetrics;

/// Common metrics tracked by all cache algorithms
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of requests (gets) made to the cache
    pub requests: u64,

    /// Number of requests that resulted in cache hits
    pub cache_hits: u64,

    /// Number of new entries written into the cache
    pub insertions: u64,

    /// Number of entries evicted from the cache due to capacity constraints
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request that was served from the cache.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a request that was not found. Misses are derived as
    /// `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new entry written into the cache.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an entry pushed out by capacity pressure.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Number of requests that were not served from the cache
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Hit rate between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Miss rate between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Trait that all cache algorithms implement for metrics reporting
///
/// Sharded caches sum the maps of their segments and recompute the rates.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "ARC", "LRU")
    fn algorithm_name(&self) -> &'static str;
}

/// Keys whose values are ratios and must be recomputed, not summed.
const RATE_KEYS: [&str; 3] = ["hit_rate", "miss_rate", "eviction_rate"];

/// Sums per-segment metric maps and recomputes the rate keys from the sums.
pub(crate) fn merge_metrics<I>(maps: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = BTreeMap<String, f64>>,
{
    let mut merged: BTreeMap<String, f64> = BTreeMap::new();
    for map in maps {
        for (key, value) in map {
            if RATE_KEYS.contains(&key.as_str()) {
                continue;
            }
            *merged.entry(key).or_insert(0.0) += value;
        }
    }

    let requests = merged.get("requests").copied().unwrap_or(0.0);
    let hits = merged.get("cache_hits").copied().unwrap_or(0.0);
    let evictions = merged.get("evictions").copied().unwrap_or(0.0);
    let (hit_rate, miss_rate) = if requests > 0.0 {
        (hits / requests, (requests - hits) / requests)
    } else {
        (0.0, 0.0)
    };
    merged.insert("hit_rate".to_string(), hit_rate);
    merged.insert("miss_rate".to_string(), miss_rate);
    if requests > 0.0 {
        merged.insert("eviction_rate".to_string(), evictions / requests);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_metrics_rates() {
        let mut metrics = CoreCacheMetrics::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.miss_rate(), 0.0);

        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        assert_eq!(metrics.requests, 4);
        assert_eq!(metrics.cache_misses(), 1);
        assert_eq!(metrics.hit_rate(), 0.75);
        assert_eq!(metrics.miss_rate(), 0.25);
    }

    #[test]
    fn test_core_metrics_map() {
        let mut metrics = CoreCacheMetrics::new();
        metrics.record_insertion();
        metrics.record_eviction();
        let map = metrics.to_btreemap();
        assert_eq!(map.get("insertions"), Some(&1.0));
        assert_eq!(map.get("evictions"), Some(&1.0));
        assert!(!map.contains_key("eviction_rate"));

        metrics.record_miss();
        let map = metrics.to_btreemap();
        assert_eq!(map.get("eviction_rate"), Some(&1.0));
    }

    #[test]
    fn test_merge_recomputes_rates() {
        let mut a = CoreCacheMetrics::new();
        a.record_hit();
        let mut b = CoreCacheMetrics::new();
        b.record_miss();
        b.record_miss();
        b.record_miss();

        let merged = merge_metrics([a.to_btreemap(), b.to_btreemap()]);
        assert_eq!(merged.get("requests"), Some(&4.0));
        assert_eq!(merged.get("cache_hits"), Some(&1.0));
        assert_eq!(merged.get("hit_rate"), Some(&0.25));
        assert_eq!(merged.get("miss_rate"), Some(&0.75));
    }
}
