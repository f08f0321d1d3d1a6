//! ARC Cache Metrics
//!
//! Besides the core counters, ARC reports how often entries were promoted,
//! how often each ghost list was hit, how many capacity units moved between
//! the tiers and the current split.

use std::collections::BTreeMap;

use super::{CacheMetrics, CoreCacheMetrics};

/// ARC-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArcCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Entries moved from the recency tier to the frequency tier
    pub promotions: u64,

    /// Puts that hit the recency ghost list
    pub recency_ghost_hits: u64,

    /// Puts that hit the frequency ghost list
    pub frequency_ghost_hits: u64,

    /// Capacity units moved between the tiers, in either direction
    pub capacity_transfers: u64,

    /// Frequency decay passes
    pub decays: u64,

    /// Main capacity of the recency tier at snapshot time
    pub recency_capacity: u64,

    /// Main capacity of the frequency tier at snapshot time
    pub frequency_capacity: u64,
}

impl ArcCacheMetrics {
    /// Creates a zeroed set of counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert ARC metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("promotions".to_string(), self.promotions as f64);
        metrics.insert(
            "recency_ghost_hits".to_string(),
            self.recency_ghost_hits as f64,
        );
        metrics.insert(
            "frequency_ghost_hits".to_string(),
            self.frequency_ghost_hits as f64,
        );
        metrics.insert(
            "capacity_transfers".to_string(),
            self.capacity_transfers as f64,
        );
        metrics.insert("decays".to_string(), self.decays as f64);
        metrics.insert("recency_capacity".to_string(), self.recency_capacity as f64);
        metrics.insert(
            "frequency_capacity".to_string(),
            self.frequency_capacity as f64,
        );

        metrics
    }
}

impl CacheMetrics for ArcCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "ARC"
    }
}
