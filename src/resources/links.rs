//! Affiliate links.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{display_date, Resource};
use crate::format::format_percentage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub clicks: u64,
    /// Commission rate in percent; the backend sends numbers or numeric strings
    #[serde(default)]
    pub commission: Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRow {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub product: String,
    pub clicks: u64,
    pub commission: String,
    pub created_at: String,
}

/// `GET /links`. Falls back to an empty list when the backend keeps failing.
pub struct Links;

impl Resource for Links {
    const NAMESPACE: &'static str = "links";
    const ENDPOINT: &'static str = "links";
    const DEGRADE_ON_SERVER_ERROR: bool = true;

    type Item = LinkItem;
    type Row = LinkRow;

    fn project(item: &LinkItem) -> LinkRow {
        LinkRow {
            id: item.id,
            name: item.name.clone(),
            url: item.url.clone(),
            product: item.product.clone().unwrap_or_else(|| "-".to_string()),
            clicks: item.clicks,
            commission: format_percentage(&item.commission),
            created_at: display_date(item.created_at.as_deref()),
        }
    }
}
