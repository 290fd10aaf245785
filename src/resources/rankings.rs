//! Affiliate revenue ranking.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Resource;
use crate::error::Result;
use crate::format::{format_currency, format_percentage, period_to_date_range, today};
use crate::query::Filter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankItem {
    pub position: u32,
    pub name: String,
    #[serde(default)]
    pub revenue: Value,
    #[serde(default)]
    pub sales: u64,
    #[serde(default)]
    pub conversion_rate: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankRow {
    pub position: u32,
    pub name: String,
    pub revenue: String,
    pub sales: u64,
    pub conversion_rate: String,
}

/// `GET /affiliates/ranking`.
///
/// Consumers filter by a named `period`; the backend expects a
/// `date_range` of `start:end`.
pub struct AffiliateRanks;

impl Resource for AffiliateRanks {
    const NAMESPACE: &'static str = "rankings";
    const ENDPOINT: &'static str = "affiliates/ranking";

    type Item = RankItem;
    type Row = RankRow;

    fn project(item: &RankItem) -> RankRow {
        RankRow {
            position: item.position,
            name: item.name.clone(),
            revenue: format_currency(&item.revenue),
            sales: item.sales,
            conversion_rate: format_percentage(&item.conversion_rate),
        }
    }

    fn query_params(filter: &Filter) -> Result<Vec<(String, String)>> {
        let mut query: Vec<(String, String)> = filter
            .to_query(Self::PAGE_SIZE_PARAM)
            .into_iter()
            .filter(|(name, _)| name != "period")
            .collect();

        if let Some(period) = filter.text("period") {
            if let Some(range) = period_to_date_range(&period, today())? {
                query.push(("date_range".to_string(), range));
            }
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use serde_json::json;

    #[test]
    fn test_project_rank() {
        let item: RankItem = serde_json::from_value(json!({
            "position": 1,
            "name": "Ana",
            "revenue": 98765.4,
            "sales": 120,
            "conversion_rate": 3.25
        }))
        .unwrap();

        let row = AffiliateRanks::project(&item);
        assert_eq!(row.revenue, "R$ 98.765,40");
        assert_eq!(row.conversion_rate, "3.25%");
    }

    #[test]
    fn test_period_becomes_date_range() {
        let filter = Filter::new(10).with("period", "today");
        let query = AffiliateRanks::query_params(&filter).unwrap();

        let range = query
            .iter()
            .find(|(name, _)| name == "date_range")
            .map(|(_, value)| value.clone())
            .unwrap();
        let day = today().format("%Y-%m-%d").to_string();
        assert_eq!(range, format!("{}:{}", day, day));
        assert!(!query.iter().any(|(name, _)| name == "period"));
    }

    #[test]
    fn test_all_period_omits_date_range() {
        let filter = Filter::new(10).with("period", "all");
        let query = AffiliateRanks::query_params(&filter).unwrap();
        assert!(!query.iter().any(|(name, _)| name == "date_range" || name == "period"));
    }

    #[test]
    fn test_unknown_period_is_validation_error() {
        let filter = Filter::new(10).with("period", "fortnight");
        let result = AffiliateRanks::query_params(&filter);
        assert!(matches!(result, Err(DashboardError::Validation(_))));
    }
}
