//! Cache Configuration Module
//!
//! Each cache type has its own configuration struct with public fields, so a
//! config is built by naming every field. `validate` checks a config strictly;
//! the `init` constructors accept any config and clamp out-of-range values.
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | `ArcCacheConfig` | [`ArcCache`](crate::ArcCache) | Adaptive Replacement Cache |
//! | `LruCacheConfig` | [`LruCache`](crate::LruCache) | Least Recently Used |
//! | `LfuCacheConfig` | [`LfuCache`](crate::LfuCache) | Least Frequently Used, optional aging |
//! | `HistoryCacheConfig` | [`HistoryCache`](crate::HistoryCache) | History-gated admission |
//!
//! # Concurrent Cache Configs
//!
//! Use `ConcurrentCacheConfig<C>` around a base config:
//!
//! | Type Alias | Base Config | Description |
//! |------------|-------------|-------------|
//! | `ConcurrentArcCacheConfig` | `ArcCacheConfig` | Sharded ARC |
//! | `ConcurrentLruCacheConfig` | `LruCacheConfig` | Sharded LRU |
//! | `ConcurrentLfuCacheConfig` | `LfuCacheConfig` | Sharded LFU |
//!
//! # Examples
//!
//! ```
//! use arc_cache::config::ArcCacheConfig;
//! use arc_cache::ArcCache;
//!
//! let config = ArcCacheConfig {
//!     capacity: 1000,
//!     transform_threshold: 2,
//!     max_average_frequency: None,
//! };
//! let cache: ArcCache<String, i32> = ArcCache::init(config, None);
//! ```

pub mod arc;
pub mod history;
pub mod lfu;
pub mod lru;

pub use arc::ArcCacheConfig;
pub use history::HistoryCacheConfig;
pub use lfu::LfuCacheConfig;
pub use lru::LruCacheConfig;

use crate::error::ConfigError;

/// Generic configuration wrapper for sharded caches.
///
/// Wraps a base cache configuration, whose capacity is the total across all
/// segments, and adds the number of independent segments.
///
/// # Example
///
/// ```
/// use arc_cache::config::{ArcCacheConfig, ConcurrentArcCacheConfig, ConcurrentCacheConfig};
///
/// let config: ConcurrentArcCacheConfig = ConcurrentCacheConfig {
///     base: ArcCacheConfig::new(10_000, 2),
///     segments: 16,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ConcurrentCacheConfig<C> {
    /// Base configuration; its capacity is split across the segments
    pub base: C,
    /// Number of segments for sharding (more segments = less contention)
    pub segments: usize,
}

impl<C: core::fmt::Debug> core::fmt::Debug for ConcurrentCacheConfig<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentCacheConfig")
            .field("base", &self.base)
            .field("segments", &self.segments)
            .finish()
    }
}

/// Configuration for a sharded ARC cache.
/// Type alias for `ConcurrentCacheConfig<ArcCacheConfig>`.
pub type ConcurrentArcCacheConfig = ConcurrentCacheConfig<ArcCacheConfig>;

/// Configuration for a sharded LRU cache.
/// Type alias for `ConcurrentCacheConfig<LruCacheConfig>`.
pub type ConcurrentLruCacheConfig = ConcurrentCacheConfig<LruCacheConfig>;

/// Configuration for a sharded LFU cache.
/// Type alias for `ConcurrentCacheConfig<LfuCacheConfig>`.
pub type ConcurrentLfuCacheConfig = ConcurrentCacheConfig<LfuCacheConfig>;

impl ConcurrentArcCacheConfig {
    /// Validates the base config and the segment count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        validate_segments(self.segments, self.base.capacity)
    }
}

impl ConcurrentLruCacheConfig {
    /// Validates the base config and the segment count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        validate_segments(self.segments, self.base.capacity)
    }
}

impl ConcurrentLfuCacheConfig {
    /// Validates the base config and the segment count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base.validate()?;
        validate_segments(self.segments, self.base.capacity)
    }
}

fn validate_segments(segments: usize, capacity: usize) -> Result<(), ConfigError> {
    if segments == 0 {
        return Err(ConfigError::ZeroSegments);
    }
    if segments > capacity {
        return Err(ConfigError::TooManySegments { segments, capacity });
    }
    Ok(())
}

/// Returns the default number of segments based on available parallelism.
///
/// Used by the `new` constructors of the sharded caches.
pub fn default_segment_count() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(16)
        .clamp(4, 64)
}
