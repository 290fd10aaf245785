//! Query Module
//!
//! Filter state, cache key derivation and per-key fetch status.

mod filter;
mod key;
mod state;


pub use filter::{Filter, FilterPatch, FilterStore, FilterValue};
pub use key::{derive_key, FetchKey};
pub use state::FetchStatus;
