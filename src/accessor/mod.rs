//! Accessor Module
//!
//! The consumer-facing side: a generic collection reader that ties the
//! filter store, cache and executor together, and the write path that
//! invalidates what it changed.

mod collection;
mod mutation;

pub use collection::{Collection, CollectionView};
pub use mutation::{Mutation, MutationDispatcher, MutationOutcome};
