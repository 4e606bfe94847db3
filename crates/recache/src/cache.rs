//! LruCache: bounded key-value cache with least-recently-used eviction

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use ahash::RandomState;
use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::order::{Handle, OrderList};
use crate::stats::{CacheStats, StatsSnapshot};

/// Upper bound on slots reserved up front; larger caches grow on demand
const PREALLOC_LIMIT: usize = 1024;

/// Index and recency list, always mutated together under one lock
struct Inner<K, V> {
    index: HashMap<K, Handle, RandomState>,
    order: OrderList<K, V>,
}

impl<K, V> Inner<K, V>
where
    K: Hash + Eq,
{
    fn pop_back(&mut self) -> Option<(K, V)> {
        let tail = self.order.back()?;
        let entry = self.order.remove(tail)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn len(&self) -> usize {
        debug_assert_eq!(self.index.len(), self.order.len());
        self.order.len()
    }
}

/// Thread-safe fixed-capacity LRU cache
///
/// Every operation takes the same exclusive lock, so all calls on one
/// cache are linearized. Reads promote: a successful [`get`](Self::get)
/// makes the key the most recently used.
///
/// ```
/// use recache::LruCache;
///
/// let cache = LruCache::new(2)?;
/// cache.add("a", 1);
/// cache.add("b", 2);
/// cache.get("a");
/// cache.add("c", 3);
///
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.get("a"), Some(1));
/// # Ok::<(), recache::CacheError>(())
/// ```
pub struct LruCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    stats: CacheStats,
    config: CacheConfig,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create an empty cache holding at most `capacity` entries
    ///
    /// # Errors
    /// * `CacheError::InvalidArgument` - `capacity` is zero or negative
    pub fn new(capacity: i64) -> Result<Self> {
        Self::with_config(CacheConfig::new(capacity))
    }

    /// Create an empty cache from a [`CacheConfig`]
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        let capacity = config.validate().inspect_err(|e| {
            warn!("Rejected cache config: {}", e);
        })?;

        debug!(capacity, expiry = ?config.expiry, "Creating LRU cache");

        let reserve = capacity.min(PREALLOC_LIMIT);
        Ok(Self {
            inner: Mutex::new(Inner {
                index: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
                order: OrderList::with_capacity(reserve),
            }),
            stats: CacheStats::new(),
            config,
            capacity,
        })
    }

    /// Insert or overwrite `key`, making it the most recently used
    ///
    /// Inserting a new key into a full cache evicts the least recently
    /// used entry.
    pub fn add(&self, key: K, value: V) {
        let touched_at = self.timestamp();
        let mut inner = self.inner.lock();

        if let Some(handle) = inner.index.get(&key).copied() {
            inner.order.move_to_front(handle);
            if let Some(entry) = inner.order.get_mut(handle) {
                entry.value = value;
                entry.touched_at = touched_at;
            }
            self.stats.record_update();
            return;
        }

        let handle = inner.order.push_front(key.clone(), value, touched_at);
        inner.index.insert(key, handle);
        self.stats.record_insert();

        if inner.len() > self.capacity && inner.pop_back().is_some() {
            self.stats.record_eviction();
            trace!(capacity = self.capacity, "Evicted least recently used entry");
        }
    }

    /// Look up `key`, promoting it to most recently used on a hit
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.lock();

        match inner.index.get(key).copied() {
            Some(handle) => {
                inner.order.move_to_front(handle);
                self.stats.record_hit();
                inner.order.get(handle).map(|entry| entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Look up `key` without touching recency or statistics
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let inner = self.inner.lock();
        let handle = *inner.index.get(key)?;
        inner.order.get(handle).map(|entry| entry.value.clone())
    }

    /// Check for `key` without touching recency
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().index.contains_key(key)
    }

    /// Remove `key`, returning its value if it was present
    ///
    /// Removing an absent key is a no-op.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.inner.lock();
        let handle = inner.index.remove(key)?;
        let entry = inner.order.remove(handle)?;
        self.stats.record_removal();
        Some(entry.value)
    }

    /// Evict the least recently used entry, if any
    pub fn remove_oldest(&self) -> Option<(K, V)> {
        let mut inner = self.inner.lock();
        let evicted = inner.pop_back();
        if evicted.is_some() {
            self.stats.record_eviction();
        }
        evicted
    }

    /// Number of entries currently held
    pub fn size(&self) -> usize {
        self.inner.lock().len()
    }

    /// Alias for [`size`](Self::size)
    pub fn len(&self) -> usize {
        self.size()
    }

    /// True when the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured expiry, if any
    pub fn expiry(&self) -> Option<Duration> {
        self.config.expiry
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        let inner = self.inner.lock();
        inner.order.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Millisecond timestamp of the last write to `key`
    ///
    /// Always `Some(0)` for present keys when no expiry is configured.
    pub fn touched_at<Q>(&self, key: &Q) -> Option<i64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let inner = self.inner.lock();
        let handle = *inner.index.get(key)?;
        inner.order.get(handle).map(|entry| entry.touched_at)
    }

    /// Drop every entry, keeping the capacity
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let dropped = inner.len();
        inner.index.clear();
        inner.order.clear();
        debug!(dropped, "Cleared LRU cache");
    }

    /// Current statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Zero all statistics counters
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    fn timestamp(&self) -> i64 {
        if self.config.tracks_time() {
            Utc::now().timestamp_millis()
        } else {
            0
        }
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.inner.lock().order.len())
            .field("expiry", &self.config.expiry)
            .finish()
    }
}
