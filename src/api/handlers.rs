//! API Handlers
//!
//! HTTP request handlers for the gateway. Reads go through a per-request
//! [`Collection`]; writes through the shared [`MutationDispatcher`].

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::accessor::{Collection, CollectionView, Mutation, MutationDispatcher, MutationOutcome};
use crate::cache::QueryCache;
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::models::{
    CreateLinkRequest, HealthResponse, InvalidateResponse, RejectBillingRequest, StatsResponse,
    WithdrawalRequest,
};
use crate::query::FilterStore;
use crate::remote::RemoteExecutor;
use crate::resources::Resource;

/// Application state shared across all handlers.
///
/// One cache service and one executor for the whole process; cloning the
/// state clones handles, not data.
#[derive(Clone)]
pub struct AppState {
    pub cache: QueryCache,
    pub executor: Arc<RemoteExecutor>,
    pub mutations: MutationDispatcher,
}

impl AppState {
    pub fn new(cache: QueryCache, executor: Arc<RemoteExecutor>) -> Self {
        let mutations = MutationDispatcher::new(cache.clone(), Arc::clone(&executor));
        Self {
            cache,
            executor,
            mutations,
        }
    }

    /// Creates the state from configuration.
    ///
    /// Fails only if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = QueryCache::from_config(config);
        let executor = RemoteExecutor::from_config(config)?;
        Ok(Self::new(cache, Arc::new(executor)))
    }
}

// == Collection Reads ==
/// Handler for `GET /api/{links,billings,withdrawals,rankings}`
///
/// Query parameters become the filter: `page`, `perpage`, and any resource
/// specific field.
pub async fn list_handler<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<CollectionView<R::Row>>> {
    let filters = FilterStore::from_query(R::DEFAULT_PAGE_SIZE, &params)?;
    let collection =
        Collection::<R>::with_filter(state.cache.clone(), Arc::clone(&state.executor), filters);

    Ok(Json(collection.load().await?))
}

// == Writes ==
/// Handler for `POST /api/links`
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<Json<MutationOutcome>> {
    if let Some(error_msg) = req.validate() {
        return Err(DashboardError::Validation(error_msg));
    }

    let outcome = state
        .mutations
        .mutate(&Mutation::create_link(), Some(&req.to_body()))
        .await?;
    Ok(Json(outcome))
}

/// Handler for `POST /api/billings/:id/approve`
pub async fn approve_billing_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MutationOutcome>> {
    let outcome = state
        .mutations
        .mutate(&Mutation::approve_billing(id), None)
        .await?;
    Ok(Json(outcome))
}

/// Handler for `POST /api/billings/:id/reject`
pub async fn reject_billing_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<RejectBillingRequest>,
) -> Result<Json<MutationOutcome>> {
    if let Some(error_msg) = req.validate() {
        return Err(DashboardError::Validation(error_msg));
    }

    let outcome = state
        .mutations
        .mutate(&Mutation::reject_billing(id), Some(&req.to_body()))
        .await?;
    Ok(Json(outcome))
}

/// Handler for `POST /api/withdrawals`
pub async fn request_withdrawal_handler(
    State(state): State<AppState>,
    Json(req): Json<WithdrawalRequest>,
) -> Result<Json<MutationOutcome>> {
    if let Some(error_msg) = req.validate() {
        return Err(DashboardError::Validation(error_msg));
    }

    let outcome = state
        .mutations
        .mutate(&Mutation::request_withdrawal(), Some(&req.to_body()))
        .await?;
    Ok(Json(outcome))
}

// == Operations ==
/// Handler for `DELETE /cache/:namespace`
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.invalidate_namespace(&namespace);
    Json(InvalidateResponse::new(namespace, removed))
}

/// Handler for `GET /stats`
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheSource, CacheStore};
    use crate::query::FetchKey;
    use crate::remote::testing::{ok_message, ok_page, ScriptedTransport};
    use crate::remote::RetryPolicy;
    use crate::resources::{Billings, Links};
    use serde_json::json;
    use std::time::Duration;

    fn state_with(transport: &Arc<ScriptedTransport>) -> AppState {
        let cache = QueryCache::new(CacheStore::new(
            100,
            Duration::from_secs(60),
            Duration::from_secs(300),
        ));
        let executor = RemoteExecutor::new(transport.clone(), RetryPolicy::new(2, Duration::ZERO));
        AppState::new(cache, Arc::new(executor))
    }

    fn params(pairs: &[(&str, &str)]) -> Query<HashMap<String, String>> {
        Query(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_list_handler_then_cache_hit() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok_page(
            json!([{"id": 1, "name": "a", "commission": 5}]),
            1,
        )]));
        let state = state_with(&transport);

        let first = list_handler::<Links>(State(state.clone()), params(&[("page", "1")]))
            .await
            .unwrap();
        assert_eq!(first.rows.len(), 1);
        assert_eq!(first.rows[0].commission, "5%");

        let second = list_handler::<Links>(State(state), params(&[]))
            .await
            .unwrap();
        assert_eq!(second.source, CacheSource::Cache);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_list_handler_rejects_bad_page() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let state = state_with(&transport);

        let result = list_handler::<Billings>(State(state), params(&[("page", "abc")])).await;
        assert!(matches!(result, Err(DashboardError::Validation(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_reject_without_reason_never_reaches_backend() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let state = state_with(&transport);

        let req = RejectBillingRequest {
            reason: "".to_string(),
        };
        let result = reject_billing_handler(State(state), Path(3), Json(req)).await;
        assert!(matches!(result, Err(DashboardError::Validation(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_approve_invalidates_billings() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ok_page(json!([{"id": 3, "amount": 10, "status": "pending"}]), 1),
            ok_message("ok"),
        ]));
        let state = state_with(&transport);

        list_handler::<Billings>(State(state.clone()), params(&[]))
            .await
            .unwrap();
        assert_eq!(state.cache.len(), 1);

        let outcome = approve_billing_handler(State(state.clone()), Path(3))
            .await
            .unwrap();
        assert_eq!(outcome.invalidated, vec!["billings"]);
        assert!(state.cache.is_empty());

        let requests = transport.requests();
        assert_eq!(requests[1].path, "billings/3/approve");
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let state = state_with(&transport);
        state.cache.set(FetchKey::raw("links", "{}"), 1_u8);

        let response = invalidate_handler(State(state.clone()), Path("links".to_string())).await;
        assert_eq!(response.removed, 1);
        assert!(state.cache.is_empty());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let response = stats_handler(State(state_with(&transport))).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.in_flight, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
