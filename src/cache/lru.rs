//! LRU Tracker Module
//!
//! Recency ordering used to bound the number of cached pages.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a monotonically increasing tick; the
/// smallest tick is the least recently used key.
#[derive(Debug)]
pub struct LruTracker<K> {
    tick: u64,
    by_tick: BTreeMap<u64, K>,
    ticks: HashMap<K, u64>,
}

impl<K: Clone + Eq + Hash> LruTracker<K> {
    pub fn new() -> Self {
        Self {
            tick: 0,
            by_tick: BTreeMap::new(),
            ticks: HashMap::new(),
        }
    }

    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &K) {
        self.tick += 1;
        if let Some(previous) = self.ticks.insert(key.clone(), self.tick) {
            self.by_tick.remove(&previous);
        }
        self.by_tick.insert(self.tick, key.clone());
    }

    pub fn remove(&mut self, key: &K) {
        if let Some(tick) = self.ticks.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<K> {
        let (_, key) = self.by_tick.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }
}

impl<K: Clone + Eq + Hash> Default for LruTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
