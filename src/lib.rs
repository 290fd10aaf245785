//! Dashboard Query - filtered, paginated, cached remote collections
//!
//! Reads the affiliate dashboard's backend collections through one shared
//! cache with in-flight de-duplication, projects them for display, and
//! serves them through a small HTTP gateway.

pub mod accessor;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod query;
pub mod remote;
pub mod resources;
pub mod tasks;

pub use accessor::{Collection, CollectionView, Mutation, MutationDispatcher, MutationOutcome};
pub use api::{create_router, AppState};
pub use cache::QueryCache;
pub use config::Config;
pub use error::{DashboardError, Result};
pub use remote::{HttpTransport, RemoteExecutor, RetryPolicy, Transport};
pub use tasks::spawn_cleanup_task;
