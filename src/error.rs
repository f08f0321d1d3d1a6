//! Error types for the cache crate.
//!
//! - [`ConfigError`]: a configuration value is out of range. Returned by the
//!   strict `try_init` constructors and by the `validate` methods on config
//!   structs. The lenient `init` constructors clamp instead.
//! - [`InvariantError`]: an internal bookkeeping invariant does not hold.
//!   Returned by `check_invariants`, which exists for tests and debugging.
//!
//! ```
//! use arc_cache::config::ArcCacheConfig;
//! use arc_cache::error::ConfigError;
//! use arc_cache::ArcCache;
//!
//! let err = ArcCache::<u64, u64>::try_init(ArcCacheConfig::new(0, 2), None).unwrap_err();
//! assert_eq!(err, ConfigError::ZeroCapacity);
//! ```

use thiserror::Error;

/// Error returned when cache configuration parameters are invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The total capacity is zero, so the cache could never hold an entry.
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    /// A promotion or admission threshold of zero has no meaning.
    #[error("threshold must be greater than zero")]
    ZeroThreshold,

    /// A sharded cache needs at least one segment.
    #[error("segment count must be greater than zero")]
    ZeroSegments,

    /// More segments than capacity would leave some segments empty.
    #[error("segment count {segments} exceeds total capacity {capacity}")]
    TooManySegments {
        /// Requested segment count.
        segments: usize,
        /// Requested total capacity.
        capacity: usize,
    },
}

/// Error returned when internal cache invariants are violated.
///
/// Carries a description of the first invariant found broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cache invariant violated: {0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "cache capacity must be greater than zero"
        );
        let err = ConfigError::TooManySegments {
            segments: 8,
            capacity: 4,
        };
        assert_eq!(err.to_string(), "segment count 8 exceeds total capacity 4");
    }

    #[test]
    fn test_invariant_error_message() {
        let err = InvariantError::new("split drifted");
        assert_eq!(err.message(), "split drifted");
        assert_eq!(err.to_string(), "cache invariant violated: split drifted");
    }

    #[test]
    fn test_errors_are_std_errors() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<ConfigError>();
        assert_error::<InvariantError>();
    }
}
