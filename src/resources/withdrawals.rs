//! Withdrawal requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{display_date, Resource};
use crate::format::format_currency;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalItem {
    pub id: u64,
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub requested_at: Option<String>,
    #[serde(default)]
    pub pix_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalRow {
    pub id: u64,
    pub amount: String,
    pub status: String,
    pub requested_at: String,
    pub pix_key: String,
}

/// `GET /withdrawals`. Paged with `per_page`.
pub struct Withdrawals;

impl Resource for Withdrawals {
    const NAMESPACE: &'static str = "withdrawals";
    const ENDPOINT: &'static str = "withdrawals";
    const PAGE_SIZE_PARAM: &'static str = "per_page";

    type Item = WithdrawalItem;
    type Row = WithdrawalRow;

    fn project(item: &WithdrawalItem) -> WithdrawalRow {
        WithdrawalRow {
            id: item.id,
            amount: format_currency(&item.amount),
            status: item.status.clone(),
            requested_at: display_date(item.requested_at.as_deref()),
            pix_key: item.pix_key.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}
