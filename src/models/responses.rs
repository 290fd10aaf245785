//! Response DTOs for the gateway API
//!
//! Collection views and mutation outcomes serialize themselves; these cover
//! the operational endpoints.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub network_fetches: u64,
    pub deduplicated: u64,
    pub invalidated: u64,
    pub evictions: u64,
    pub degraded: u64,
    pub total_entries: usize,
    pub in_flight: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            network_fetches: stats.network_fetches,
            deduplicated: stats.deduplicated,
            invalidated: stats.invalidated,
            evictions: stats.evictions,
            degraded: stats.degraded,
            total_entries: stats.total_entries,
            in_flight: stats.in_flight,
        }
    }
}

/// Response body for `DELETE /cache/:namespace`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub namespace: String,
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn new(namespace: impl Into<String>, removed: usize) -> Self {
        let namespace = namespace.into();
        Self {
            message: format!("Namespace '{}' invalidated", namespace),
            namespace,
            removed,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
