//! Retention Cleanup Task
//!
//! Background task that periodically drops cache entries older than the
//! retention window, whether or not anyone read them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::QueryCache;

/// Spawns a background task that periodically sweeps expired cache entries.
///
/// # Arguments
/// * `cache` - Shared cache service handle
/// * `cleanup_interval_secs` - Interval in seconds between sweeps (minimum 1)
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = QueryCache::from_config(&config);
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 5);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: QueryCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting retention cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();
            if removed > 0 {
                info!("Retention cleanup: removed {} expired entries", removed);
            } else {
                debug!("Retention cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::query::FetchKey;

    fn cache(retention: Duration) -> QueryCache {
        QueryCache::new(CacheStore::new(100, Duration::from_millis(100), retention))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = cache(Duration::from_millis(500));
        cache.set(FetchKey::raw("links", "{\"page\":1}"), 1_u32);

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(cache.is_empty(), "Expired entry should have been cleaned up");
        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_retained_entries() {
        let cache = cache(Duration::from_secs(3600));
        cache.set(FetchKey::raw("links", "{\"page\":1}"), 1_u32);

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Stale but retained
        assert_eq!(cache.len(), 1);
        assert!(!cache.is_fresh(&FetchKey::raw("links", "{\"page\":1}")));
        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(cache(Duration::from_secs(300)), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
