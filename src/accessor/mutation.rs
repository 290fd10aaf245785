//! Mutation Dispatcher
//!
//! Write-then-invalidate. A write that the backend accepts drops every
//! cached page of the namespaces it touches; a failed write leaves the
//! cache exactly as it was.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::cache::QueryCache;
use crate::error::Result;
use crate::remote::RemoteExecutor;
use crate::resources::{Billings, Links, Resource, Withdrawals};

// == Mutation ==
/// A backend write and the namespaces it makes stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub method: Method,
    pub path: String,
    pub invalidates: Vec<&'static str>,
}

impl Mutation {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            invalidates: Vec::new(),
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Adds a namespace to drop once the write succeeds.
    pub fn invalidating(mut self, namespace: &'static str) -> Self {
        if !self.invalidates.contains(&namespace) {
            self.invalidates.push(namespace);
        }
        self
    }

    // == Dashboard Writes ==
    pub fn create_link() -> Self {
        Self::post(Links::ENDPOINT).invalidating(Links::NAMESPACE)
    }

    pub fn approve_billing(id: u64) -> Self {
        Self::post(format!("{}/{}/approve", Billings::ENDPOINT, id))
            .invalidating(Billings::NAMESPACE)
    }

    pub fn reject_billing(id: u64) -> Self {
        Self::post(format!("{}/{}/reject", Billings::ENDPOINT, id))
            .invalidating(Billings::NAMESPACE)
    }

    pub fn request_withdrawal() -> Self {
        Self::post(Withdrawals::ENDPOINT).invalidating(Withdrawals::NAMESPACE)
    }
}

/// Result of an accepted write.
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub message: Option<String>,
    pub data: Option<Value>,
    pub invalidated: Vec<&'static str>,
}

// == Dispatcher ==
#[derive(Clone)]
pub struct MutationDispatcher {
    cache: QueryCache,
    executor: Arc<RemoteExecutor>,
}

impl MutationDispatcher {
    pub fn new(cache: QueryCache, executor: Arc<RemoteExecutor>) -> Self {
        Self { cache, executor }
    }

    /// Sends `mutation` once; on success invalidates its namespaces.
    pub async fn mutate(&self, mutation: &Mutation, body: Option<&Value>) -> Result<MutationOutcome> {
        let envelope = match self
            .executor
            .execute(mutation.method.clone(), &mutation.path, body)
            .await
        {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(path = %mutation.path, error = %error, "write failed; cache left intact");
                return Err(error);
            }
        };

        for namespace in &mutation.invalidates {
            self.cache.invalidate_namespace(namespace);
        }
        info!(
            path = %mutation.path,
            invalidated = ?mutation.invalidates,
            "write accepted"
        );

        Ok(MutationOutcome {
            message: envelope.message,
            data: envelope.data,
            invalidated: mutation.invalidates.clone(),
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::Collection;
    use crate::cache::{CacheSource, CacheStore};
    use crate::error::DashboardError;
    use crate::remote::testing::{ok_message, ok_page, status, ScriptedTransport};
    use crate::remote::{CollectionPage, RawResponse, RetryPolicy};
    use crate::resources::LinkItem;
    use serde_json::json;
    use std::time::Duration;

    fn setup(transport: &Arc<ScriptedTransport>) -> (QueryCache, Arc<RemoteExecutor>) {
        let cache = QueryCache::new(CacheStore::new(
            100,
            Duration::from_secs(60),
            Duration::from_secs(300),
        ));
        let executor = Arc::new(RemoteExecutor::new(
            transport.clone(),
            RetryPolicy::new(2, Duration::ZERO),
        ));
        (cache, executor)
    }

    fn billing_page() -> Result<RawResponse> {
        ok_page(json!([{"id": 1, "amount": 50, "status": "pending"}]), 1)
    }

    #[test]
    fn test_dashboard_mutations() {
        let approve = Mutation::approve_billing(7);
        assert_eq!(approve.path, "billings/7/approve");
        assert_eq!(approve.invalidates, vec!["billings"]);

        let reject = Mutation::reject_billing(7).invalidating("billings");
        assert_eq!(reject.path, "billings/7/reject");
        assert_eq!(reject.invalidates.len(), 1);

        assert_eq!(Mutation::create_link().invalidates, vec!["links"]);
        assert_eq!(Mutation::request_withdrawal().method, Method::POST);
    }

    #[tokio::test]
    async fn test_success_invalidates_and_next_read_refetches_once() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            billing_page(),
            ok_message("Cobrança aprovada"),
            billing_page(),
        ]));
        let (cache, executor) = setup(&transport);
        let billings: Collection<Billings> = Collection::new(cache.clone(), executor.clone());
        let links: Collection<Links> = Collection::new(cache.clone(), executor.clone());
        cache.set(links.key(), CollectionPage::<LinkItem>::empty());

        billings.load().await.unwrap();
        assert_eq!(transport.calls(), 1);

        let dispatcher = MutationDispatcher::new(cache.clone(), executor);
        let outcome = dispatcher
            .mutate(&Mutation::approve_billing(1), None)
            .await
            .unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Cobrança aprovada"));
        assert_eq!(outcome.invalidated, vec!["billings"]);
        assert_eq!(transport.calls(), 2);

        let view = billings.load().await.unwrap();
        assert_eq!(view.source, CacheSource::Network);
        assert_eq!(transport.calls(), 3);

        let view = billings.load().await.unwrap();
        assert_eq!(view.source, CacheSource::Cache);
        assert_eq!(transport.calls(), 3);

        // Other namespaces untouched
        assert_eq!(links.load().await.unwrap().source, CacheSource::Cache);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_failure_leaves_cache_intact() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            billing_page(),
            status(422, "Motivo obrigatório"),
        ]));
        let (cache, executor) = setup(&transport);
        let billings: Collection<Billings> = Collection::new(cache.clone(), executor.clone());
        billings.load().await.unwrap();

        let dispatcher = MutationDispatcher::new(cache.clone(), executor);
        let error = dispatcher
            .mutate(&Mutation::reject_billing(1), Some(&json!({})))
            .await
            .unwrap_err();

        assert_eq!(
            error,
            DashboardError::Client {
                status: 422,
                message: "Motivo obrigatório".into()
            }
        );
        assert_eq!(billings.load().await.unwrap().source, CacheSource::Cache);
        assert_eq!(transport.calls(), 2);
        assert_eq!(cache.stats().invalidated, 0);
    }

    #[tokio::test]
    async fn test_server_error_on_write_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![status(503, "down")]));
        let (cache, executor) = setup(&transport);
        let dispatcher = MutationDispatcher::new(cache, executor);

        let error = dispatcher
            .mutate(&Mutation::request_withdrawal(), Some(&json!({"amount": 10})))
            .await
            .unwrap_err();

        assert!(error.is_retryable());
        assert_eq!(transport.calls(), 1);
    }
}
