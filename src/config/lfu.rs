//! Configuration for the Least Frequently Used (LFU) cache.
//!
//! # Examples
//!
//! ```
//! use arc_cache::config::LfuCacheConfig;
//! use arc_cache::LfuCache;
//! use core::num::NonZeroUsize;
//!
//! // Counts grow without bound
//! let config = LfuCacheConfig {
//!     capacity: 100,
//!     max_average_frequency: None,
//! };
//! let cache: LfuCache<String, i32> = LfuCache::init(config, None);
//!
//! // Counts are aged once their average passes 10
//! let config = LfuCacheConfig::new(1000)
//!     .with_max_average_frequency(NonZeroUsize::new(10).unwrap());
//! let cache: LfuCache<String, Vec<u8>> = LfuCache::init(config, None);
//! ```

use core::fmt;
use core::num::NonZeroUsize;

use crate::error::ConfigError;

/// Configuration for an LFU cache.
///
/// # Fields
///
/// - `capacity`: maximum number of entries. Zero yields a cache that never
///   holds anything.
/// - `max_average_frequency`: when set, every access count is lowered by
///   half of this value (never below 1) as soon as the average count of the
///   resident entries exceeds it. Without aging, entries that were popular
///   long ago can hold their slots forever.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LfuCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
    /// Average access count above which all counts are decayed.
    pub max_average_frequency: Option<NonZeroUsize>,
}

impl LfuCacheConfig {
    /// Creates a config without aging.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            max_average_frequency: None,
        }
    }

    /// Enables aging above the given average access count.
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
        Ok(())
    }
}

impl fmt::Debug for LfuCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCacheConfig")
            .field("capacity", &self.capacity)
            .field("max_average_frequency", &self.max_average_frequency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lfu_config_creation() {
        let config = LfuCacheConfig::new(100);
        assert_eq!(config.capacity, 100);
        assert_eq!(config.max_average_frequency, None);

        let max = NonZeroUsize::new(10).unwrap();
        let config = config.with_max_average_frequency(max);
        assert_eq!(config.max_average_frequency, Some(max));
    }

    #[test]
    fn test_lfu_config_validate() {
        assert_eq!(LfuCacheConfig::new(1).validate(), Ok(()));
        assert_eq!(
            LfuCacheConfig::new(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
    }
}
