//! Cache Module
//!
//! Process-wide store of fetched pages with freshness, retention, namespace
//! invalidation and de-duplication of fetches in flight.

mod entry;
mod lru;
mod service;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry, Payload};
pub use lru::LruTracker;
pub use service::{CacheSource, Cached, Fetched, QueryCache};
pub use stats::CacheStats;
pub use store::{CacheStore, Lookup};
