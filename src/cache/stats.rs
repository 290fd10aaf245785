//! Cache Statistics Module
//!
//! Counters describing how reads were answered.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache behaviour across all namespaces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads answered from a fresh entry
    pub hits: u64,
    /// Reads that found no fresh entry
    pub misses: u64,
    /// Network fetches started (one per de-duplicated key)
    pub network_fetches: u64,
    /// Readers that joined a fetch already in flight
    pub deduplicated: u64,
    /// Entries removed by namespace or predicate invalidation
    pub invalidated: u64,
    /// Entries evicted by the capacity bound
    pub evictions: u64,
    /// Reads answered with the empty fallback page
    pub degraded: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Fetches currently in flight
    pub in_flight: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_network_fetch(&mut self) {
        self.network_fetches += 1;
    }

    pub fn record_deduplicated(&mut self) {
        self.deduplicated += 1;
    }

    pub fn record_invalidated(&mut self, count: usize) {
        self.invalidated += count as u64;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_degraded(&mut self) {
        self.degraded += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.network_fetches, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate() {
        let mut stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);

        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_invalidated_accumulates() {
        let mut stats = CacheStats::new();
        stats.record_invalidated(3);
        stats.record_invalidated(0);
        stats.record_invalidated(2);
        assert_eq!(stats.invalidated, 5);
    }
}
