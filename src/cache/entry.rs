//! Cache Entry Module
//!
//! A fetched page together with the key it answers and when it was fetched.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::query::FetchKey;

/// Type-erased cached value. Each namespace always stores the same concrete
/// type, so readers downcast back to it.
pub type Payload = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// Represents one cached fetch result.
#[derive(Clone)]
pub struct CacheEntry {
    /// Key the payload answers; its namespace is the invalidation tag
    pub key: FetchKey,
    /// The stored value
    pub payload: Payload,
    /// Fetch timestamp (Unix milliseconds)
    pub fetched_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(key: FetchKey, payload: Payload) -> Self {
        Self {
            key,
            payload,
            fetched_at: current_timestamp_ms(),
        }
    }

    /// Milliseconds since the payload was fetched.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.fetched_at)
    }

    // == Freshness ==
    /// Fresh while `now - fetched_at < stale_window`.
    ///
    /// A zero window means every entry is stale on arrival.
    pub fn is_fresh(&self, stale_window: Duration) -> bool {
        u128::from(self.age_ms()) < stale_window.as_millis()
    }

    // == Retention ==
    /// Expired once the entry has outlived the retention window, used or not.
    pub fn is_expired(&self, retention: Duration) -> bool {
        u128::from(self.age_ms()) >= retention.as_millis()
    }

    /// Returns the payload as `T`, or None if the entry holds another type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.payload).downcast::<T>().ok()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key.to_string())
            .field("fetched_at", &self.fetched_at)
            .finish_non_exhaustive()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
