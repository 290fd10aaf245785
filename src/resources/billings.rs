//! Accountant billings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{display_date, Resource};
use crate::format::format_currency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingItem {
    pub id: u64,
    #[serde(default)]
    pub affiliate: String,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub status: String,
    /// Reference month, `YYYY-MM`
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingRow {
    pub id: u64,
    pub affiliate: String,
    pub amount: String,
    pub status: String,
    pub month: String,
    pub due_date: String,
    pub is_paid: bool,
    pub is_pending: bool,
}

/// `GET /billings`. Falls back to an empty list when the backend keeps failing.
pub struct Billings;

impl Resource for Billings {
    const NAMESPACE: &'static str = "billings";
    const ENDPOINT: &'static str = "billings";
    const DEGRADE_ON_SERVER_ERROR: bool = true;

    type Item = BillingItem;
    type Row = BillingRow;

    fn project(item: &BillingItem) -> BillingRow {
        let status = item.status.trim().to_lowercase();
        BillingRow {
            id: item.id,
            affiliate: item.affiliate.clone(),
            amount: format_currency(&item.amount),
            is_paid: status == "paid",
            is_pending: status == "pending",
            status,
            month: item.month.as_deref().map(display_month).unwrap_or_else(|| "-".to_string()),
            due_date: display_date(item.due_date.as_deref()),
        }
    }
}

/// `2024-03` becomes `03/2024`; anything else is shown as sent.
fn display_month(month: &str) -> String {
    match month.trim().split_once('-') {
        Some((year, month)) if year.len() == 4 && month.len() == 2 => format!("{}/{}", month, year),
        _ => month.to_string(),
    }
}
