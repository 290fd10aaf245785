//! Resource Module
//!
//! One [`Resource`] per backend collection. A resource names its endpoint
//! and cache namespace, declares its raw and display item types, and owns
//! the projection between them.

mod billings;
mod links;
mod rankings;
mod withdrawals;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::format::format_date;
use crate::query::Filter;

pub use billings::{BillingItem, BillingRow, Billings};
pub use links::{LinkItem, LinkRow, Links};
pub use rankings::{AffiliateRanks, RankItem, RankRow};
pub use withdrawals::{WithdrawalItem, WithdrawalRow, Withdrawals};

/// Placeholder shown for missing or unparseable dates.
pub const NO_DATE: &str = "-";

// == Resource Trait ==
/// A paged remote collection.
pub trait Resource: Send + Sync + 'static {
    /// Cache namespace; mutations invalidate by this tag
    const NAMESPACE: &'static str;
    /// Backend path, relative to the API root
    const ENDPOINT: &'static str;
    /// Name of the page size query parameter
    const PAGE_SIZE_PARAM: &'static str = "perpage";
    const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Serve an empty page instead of an error once server errors exhaust the retries
    const DEGRADE_ON_SERVER_ERROR: bool = false;

    /// Item as the backend sends it
    type Item: DeserializeOwned + Send + Sync + 'static;
    /// Item as consumers display it
    type Row: Serialize + Send + Sync + 'static;

    /// Display form of one item. Pure; the item is left untouched.
    fn project(item: &Self::Item) -> Self::Row;

    /// Query parameters for the list request.
    fn query_params(filter: &Filter) -> Result<Vec<(String, String)>> {
        Ok(filter.to_query(Self::PAGE_SIZE_PARAM))
    }
}

/// `DD/MM/YYYY`, or [`NO_DATE`] when absent or malformed.
pub(crate) fn display_date(value: Option<&str>) -> String {
    value
        .and_then(format_date)
        .unwrap_or_else(|| NO_DATE.to_string())
}
