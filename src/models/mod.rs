//! Request and Response models for the gateway API
//!
//! Bodies the gateway accepts for writes and the small status documents it
//! serves besides the collection views.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateLinkRequest, RejectBillingRequest, WithdrawalRequest};
pub use responses::{HealthResponse, InvalidateResponse, StatsResponse};
