//! Error types for recache

use thiserror::Error;

/// Result type alias for recache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors raised while building a cache
///
/// Only construction can fail. Every operation on a built cache is total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Capacity was zero or negative
    #[error("invalid capacity {capacity}: must be greater than 0")]
    InvalidArgument {
        /// The rejected capacity
        capacity: i64,
    },
}
