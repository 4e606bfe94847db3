//! # recache
//!
//! Fixed-capacity in-process key-value cache with LRU eviction.
//!
//! ## Architecture
//! - **Index**: AHash map from key to a stable handle (O(1) lookup)
//! - **Order list**: handle-linked arena, most recently used first (O(1) promote/evict)
//! - **Locking**: one `parking_lot::Mutex` around both, so every call is linearized
//!
//! Values are opaque and returned by clone. Wrap large payloads in `Arc`.

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod order;
mod stats;

pub use cache::LruCache;
pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use error::{CacheError, Result};
pub use stats::StatsSnapshot;
