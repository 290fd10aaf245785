//! Request DTOs for the gateway API
//!
//! Each write body is checked locally before anything reaches the backend.

use serde::Deserialize;
use serde_json::{json, Value};

/// Request body for `POST /api/links`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLinkRequest {
    /// Display name of the link
    pub name: String,
    /// Product the link promotes
    pub product_id: u64,
    /// Optional landing page override
    #[serde(default)]
    pub url: Option<String>,
}

impl CreateLinkRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Link name cannot be empty".to_string());
        }
        if self.product_id == 0 {
            return Some("A product must be selected".to_string());
        }
        None
    }

    pub fn to_body(&self) -> Value {
        json!({
            "name": self.name.trim(),
            "product_id": self.product_id,
            "url": self.url,
        })
    }
}

/// Request body for `POST /api/billings/:id/reject`
#[derive(Debug, Clone, Deserialize)]
pub struct RejectBillingRequest {
    #[serde(default)]
    pub reason: String,
}

impl RejectBillingRequest {
    pub fn validate(&self) -> Option<String> {
        if self.reason.trim().is_empty() {
            return Some("A rejection reason is required".to_string());
        }
        None
    }

    pub fn to_body(&self) -> Value {
        json!({ "reason": self.reason.trim() })
    }
}

/// Request body for `POST /api/withdrawals`
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalRequest {
    /// Amount in BRL
    pub amount: f64,
    /// PIX key the money goes to
    #[serde(default)]
    pub pix_key: String,
}

impl WithdrawalRequest {
    pub fn validate(&self) -> Option<String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Some("Amount must be greater than zero".to_string());
        }
        if self.pix_key.trim().is_empty() {
            return Some("PIX key cannot be empty".to_string());
        }
        None
    }

    pub fn to_body(&self) -> Value {
        json!({
            "amount": self.amount,
            "pix_key": self.pix_key.trim(),
        })
    }
}
