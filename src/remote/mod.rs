//! Remote Module
//!
//! Talks to the REST backend: transport, response envelope, and the
//! executor that classifies, retries and degrades.

mod envelope;
mod executor;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use envelope::{ApiEnvelope, CollectionPage, PageMeta};
pub use executor::{RemoteExecutor, RetryPolicy};
pub use transport::{HttpTransport, RawResponse, Transport};
