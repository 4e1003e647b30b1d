//! Error types for the recency list and cache construction.
//!
//! - [`ListError`]: returned by [`RecencyList`](crate::list::RecencyList)
//!   operations whose preconditions do not hold (empty list, stale handle,
//!   boundary node).
//! - [`ConfigError`]: returned by fallible constructors when the configuration
//!   is invalid (zero capacity).
//!
//! Neither type is expected inside a healthy cache. [`LruCache`](crate::LruCache)
//! treats a `ListError` coming back from its own list as corruption and panics
//! at the point of detection.

use core::fmt;

/// Error returned when a recency list operation is called outside its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// `pop_front`/`pop_back` on a list with no live nodes.
    EmptyList,
    /// The handle's slot was freed, reused, or never belonged to this list.
    InvalidHandle,
    /// The handle names a boundary node, which cannot be moved, removed or read.
    BoundaryNode,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::EmptyList => f.write_str("recency list is empty"),
            ListError::InvalidHandle => f.write_str("handle does not reference a live node"),
            ListError::BoundaryNode => f.write_str("boundary nodes have no key or value"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ListError {}

/// Error returned when cache configuration parameters are invalid.
///
/// Carries a human-readable description of which parameter failed validation.
///
/// ```
/// use lru_memo::config::LruCacheConfig;
///
/// let err = LruCacheConfig::try_new(0).unwrap_err();
/// assert!(err.message().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(&'static str);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub const fn new(msg: &'static str) -> Self {
        Self(msg)
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::format;
    use std::string::ToString;

    #[test]
    fn list_error_display() {
        assert_eq!(ListError::EmptyList.to_string(), "recency list is empty");
        assert_eq!(
            ListError::InvalidHandle.to_string(),
            "handle does not reference a live node"
        );
        assert!(ListError::BoundaryNode.to_string().contains("boundary"));
    }

    #[test]
    fn config_error_message_and_display() {
        let err = ConfigError::new("capacity must be greater than zero");
        assert_eq!(err.message(), "capacity must be greater than zero");
        assert_eq!(err.to_string(), err.message());
        assert!(format!("{:?}", err).contains("capacity"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ListError>();
        assert_error::<ConfigError>();
    }
}
