//! Configuration for the history-gated admission cache.
//!
//! A key must be seen `admission_threshold` times before its value is
//! cached. Until then only its access count is remembered, in a bounded
//! history of `history_capacity` keys.
//!
//! # Examples
//!
//! ```
//! use arc_cache::config::HistoryCacheConfig;
//! use arc_cache::HistoryCache;
//!
//! // Admit keys on their second sighting
//! let config = HistoryCacheConfig {
//!     capacity: 1000,
//!     history_capacity: 4000,
//!     admission_threshold: 2,
//! };
//! let cache: HistoryCache<String, Vec<u8>> = HistoryCache::init(config, None);
//! ```

use core::fmt;

use crate::error::ConfigError;

/// Configuration for a [`HistoryCache`](crate::HistoryCache).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HistoryCacheConfig {
    /// Maximum number of admitted entries.
    pub capacity: usize,
    /// Maximum number of keys whose access counts are tracked before admission.
    pub history_capacity: usize,
    /// Number of sightings after which a key is admitted.
    pub admission_threshold: usize,
}

impl HistoryCacheConfig {
    /// Checks the config without clamping anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.admission_threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        Ok(())
    }
}

impl fmt::Debug for HistoryCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryCacheConfig")
            .field("capacity", &self.capacity)
            .field("history_capacity", &self.history_capacity)
            .field("admission_threshold", &self.admission_threshold)
            .finish()
    }
}
