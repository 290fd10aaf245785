//! API Routes
//!
//! Configures the Axum router with the gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    approve_billing_handler, create_link_handler, health_handler, invalidate_handler,
    list_handler, reject_billing_handler, request_withdrawal_handler, stats_handler, AppState,
};
use crate::resources::{AffiliateRanks, Billings, Links, Withdrawals};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET  /api/links` - Links view; `POST` creates a link
/// - `GET  /api/billings` - Billings view
/// - `POST /api/billings/:id/approve` - Approve a billing
/// - `POST /api/billings/:id/reject` - Reject a billing with a reason
/// - `GET  /api/withdrawals` - Withdrawals view; `POST` requests a withdrawal
/// - `GET  /api/rankings` - Affiliate ranking view
/// - `DELETE /cache/:namespace` - Drop every cached page of a namespace
/// - `GET  /stats` - Cache statistics
/// - `GET  /health` - Health check
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/links",
            get(list_handler::<Links>).post(create_link_handler),
        )
        .route("/api/billings", get(list_handler::<Billings>))
        .route("/api/billings/:id/approve", post(approve_billing_handler))
        .route("/api/billings/:id/reject", post(reject_billing_handler))
        .route(
            "/api/withdrawals",
            get(list_handler::<Withdrawals>).post(request_withdrawal_handler),
        )
        .route("/api/rankings", get(list_handler::<AffiliateRanks>))
        .route("/cache/:namespace", delete(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
