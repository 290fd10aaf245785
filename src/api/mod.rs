//! API Module
//!
//! HTTP handlers and routing for the dashboard gateway.
//!
//! # Endpoints
//! - `GET /api/links`, `/api/billings`, `/api/withdrawals`, `/api/rankings` - Collection views
//! - `POST /api/links`, `/api/withdrawals`, `/api/billings/:id/{approve,reject}` - Writes
//! - `DELETE /cache/:namespace` - Manual invalidation
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
