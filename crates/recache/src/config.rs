//! Cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default number of entries when none is given
pub const DEFAULT_CAPACITY: i64 = 1024;

/// Construction parameters for [`LruCache`](crate::LruCache)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries, must be positive
    pub capacity: i64,

    /// When set, entries record a millisecond timestamp on every write.
    /// Nothing expires on this basis.
    #[serde(rename = "expiry_ms", with = "expiry_ms")]
    pub expiry: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            expiry: None,
        }
    }
}

impl CacheConfig {
    /// Config with the given capacity and no expiry
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            expiry: None,
        }
    }

    /// Enable write timestamps
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Check the capacity and return it as a `usize`
    pub fn validate(&self) -> Result<usize> {
        if self.capacity <= 0 {
            return Err(CacheError::InvalidArgument {
                capacity: self.capacity,
            });
        }
        usize::try_from(self.capacity).map_err(|_| CacheError::InvalidArgument {
            capacity: self.capacity,
        })
    }

    /// True when write timestamps should be recorded
    pub(crate) fn tracks_time(&self) -> bool {
        matches!(self.expiry, Some(d) if !d.is_zero())
    }
}

mod expiry_ms {
    use std::time::Duration;

    use serde::ser::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => {
                let millis = u64::try_from(d.as_millis()).map_err(|_| {
                    S::Error::custom(format!("expiry {:?} does not fit in u64 milliseconds", d))
                })?;
                s.serialize_some(&millis)
            }
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
