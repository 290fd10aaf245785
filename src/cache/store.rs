//! Cache Store Module
//!
//! Keyed storage of fetched pages with freshness, retention and a capacity
//! bound enforced by LRU eviction.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, LruTracker, Payload};
use crate::query::FetchKey;

// == Lookup ==
/// Outcome of a read against the store.
#[derive(Debug)]
pub enum Lookup {
    /// Entry present and inside the stale window
    Fresh(Payload),
    /// Entry present but older than the stale window
    Stale,
    /// No entry, or the entry outlived the retention window
    Missing,
}

// == Cache Store ==
/// Main cache storage with LRU eviction, freshness and retention.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<FetchKey, CacheEntry>,
    lru: LruTracker<FetchKey>,
    stats: CacheStats,
    max_entries: usize,
    stale_window: Duration,
    retention: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of cached pages (at least 1)
    /// * `stale_window` - How long an entry answers without a refetch
    /// * `retention` - How long an entry is kept at all
    pub fn new(max_entries: usize, stale_window: Duration, retention: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            stale_window,
            retention,
        }
    }

    pub fn stale_window(&self) -> Duration {
        self.stale_window
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    // == Set ==
    /// Stores a payload under `key`, replacing any previous entry.
    pub fn set(&mut self, key: FetchKey, payload: Payload) {
        self.insert(CacheEntry::new(key, payload));
    }

    /// Stores a prepared entry, evicting the least recently used one at capacity.
    pub fn insert(&mut self, entry: CacheEntry) {
        let key = entry.key.clone();
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                debug!(key = %evicted, "evicting least recently used entry");
                self.entries.remove(&evicted);
                self.stats.record_eviction();
            }
        }

        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Lookup ==
    /// Reads `key`, recording a hit only for fresh entries.
    ///
    /// Entries past the retention window are dropped on sight.
    pub fn lookup(&mut self, key: &FetchKey) -> Lookup {
        let retention = self.retention;
        if self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(retention))
        {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }

        let outcome = match self.entries.get(key) {
            None => Lookup::Missing,
            Some(entry) if entry.is_fresh(self.stale_window) => {
                Lookup::Fresh(entry.payload.clone())
            }
            Some(_) => Lookup::Stale,
        };

        match outcome {
            Lookup::Fresh(_) => {
                self.stats.record_hit();
                self.lru.touch(key);
            }
            Lookup::Stale | Lookup::Missing => self.stats.record_miss(),
        }
        outcome
    }

    /// Returns the entry for `key` without touching statistics or recency.
    pub fn get(&self, key: &FetchKey) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(self.retention))
    }

    /// Freshness check against this store's stale window.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.is_fresh(self.stale_window)
    }

    // == Invalidation ==
    /// Removes every entry tagged with `namespace`. Returns the count removed.
    pub fn invalidate_namespace(&mut self, namespace: &str) -> usize {
        self.invalidate_where(|key| key.is_under(namespace))
    }

    /// Removes every entry whose key satisfies `predicate`.
    pub fn invalidate_where<P>(&mut self, predicate: P) -> usize
    where
        P: Fn(&FetchKey) -> bool,
    {
        let doomed: Vec<FetchKey> = self
            .entries
            .keys()
            .filter(|key| predicate(key))
            .cloned()
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_invalidated(doomed.len());
        self.stats.set_total_entries(self.entries.len());
        doomed.len()
    }

    // == Cleanup Expired ==
    /// Removes entries past the retention window. Returns the count removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<FetchKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.retention))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
