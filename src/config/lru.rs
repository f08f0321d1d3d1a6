//! Configuration for the Least Recently Used (LRU) cache.
//!
//! # Examples
//!
//! ```
//! use arc_cache::config::LruCacheConfig;
//! use arc_cache::LruCache;
//!
//! let config = LruCacheConfig { capacity: 10_000 };
//! let cache: LruCache<String, Vec<u8>> = LruCache::init(config, None);
//! ```

use core::fmt;

use crate::error::ConfigError;

/// Configuration for an LRU cache.
///
/// `capacity` is the maximum number of entries. Zero yields a cache that
/// never holds anything.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: usize,
}

impl LruCacheConfig {
    /// Checks the config without clamping anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_config_creation() {
        let config = LruCacheConfig { capacity: 1000 };
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_lru_config_zero_capacity() {
        let config = LruCacheConfig { capacity: 0 };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }
}
