//! Configuration for the Adaptive Replacement Cache (ARC).
//!
//! # Sizing Guidelines
//!
//! - **`capacity`**: total number of resident entries, shared between the
//!   recency and frequency tiers. Each tier also keeps a ghost list of up to
//!   `capacity` evicted keys, so key memory is roughly three times `capacity`.
//! - **`transform_threshold`**: number of accesses after which a recency-tier
//!   entry is promoted to the frequency tier. The insert counts as the first
//!   access, so a threshold of 2 promotes on the first `get`.
//! - **`max_average_frequency`**: enables frequency decay. When the average
//!   access count of frequency-tier entries exceeds this value, every count is
//!   lowered by half of it. Leave it `None` for workloads whose popularity
//!   does not drift.
//!
//! # Examples
//!
//! ```
//! use arc_cache::config::ArcCacheConfig;
//! use arc_cache::ArcCache;
//! use core::num::NonZeroUsize;
//!
//! let config = ArcCacheConfig {
//!     capacity: 1000,
//!     transform_threshold: 2,
//!     max_average_frequency: None,
//! };
//! let cache: ArcCache<String, i32> = ArcCache::init(config, None);
//!
//! // Long-running cache whose hot set changes over time
//! let config = ArcCacheConfig::new(1000, 3)
//!     .with_max_average_frequency(NonZeroUsize::new(64).unwrap());
//! let cache: ArcCache<String, Vec<u8>> = ArcCache::init(config, None);
//! ```

use core::fmt;
use core::num::NonZeroUsize;

use crate::error::ConfigError;

/// Configuration for an ARC cache.
///
/// # Fields
///
/// - `capacity`: total entries across both tiers. Zero yields a cache that
///   never holds anything.
/// - `transform_threshold`: access count that promotes a recency entry to
///   the frequency tier. Zero is clamped to 1 by `init`.
/// - `max_average_frequency`: optional decay limit for the frequency tier.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ArcCacheConfig {
    /// Total number of entries the cache can hold.
    pub capacity: usize,
    /// Access count at which an entry moves from the recency to the frequency tier.
    pub transform_threshold: usize,
    /// Average access count above which frequency-tier counts are decayed.
    pub max_average_frequency: Option<NonZeroUsize>,
}

impl ArcCacheConfig {
    /// Promotion threshold used by [`ArcCacheConfig::with_capacity`].
    pub const DEFAULT_TRANSFORM_THRESHOLD: usize = 2;

    /// Creates a config without frequency decay.
    pub const fn new(capacity: usize, transform_threshold: usize) -> Self {
        Self {
            capacity,
            transform_threshold,
            max_average_frequency: None,
        }
    }

    /// Creates a config with the default promotion threshold.
    pub const fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, Self::DEFAULT_TRANSFORM_THRESHOLD)
    }

    /// Enables frequency decay above the given average access count.
    #[must_use]
    pub const fn with_max_average_frequency(mut self, max: NonZeroUsize) -> Self {
        self.max_average_frequency = Some(max);
        self
    }

    /// Checks the config without clamping anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.transform_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        Ok(())
    }
}

impl fmt::Debug for ArcCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCacheConfig")
            .field("capacity", &self.capacity)
            .field("transform_threshold", &self.transform_threshold)
            .field("max_average_frequency", &self.max_average_frequency)
            .finish()
    }
}
