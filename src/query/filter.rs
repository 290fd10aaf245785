//! Filter State Module
//!
//! Page, page size and named filter fields for one collection consumer.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{DashboardError, Result};

/// Names owned by pagination; never accepted as filter fields.
const RESERVED_FIELDS: [&str; 3] = ["page", "perpage", "per_page"];

fn is_reserved(field: &str) -> bool {
    if RESERVED_FIELDS.contains(&field) {
        warn!(field, "pagination parameter passed as a filter field; ignored");
        true
    } else {
        false
    }
}

// == Filter Value ==
/// Scalar value of a named filter field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Flag(bool),
    Integer(i64),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Flag(b) => write!(f, "{}", b),
            FilterValue::Integer(n) => write!(f, "{}", n),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Flag(value)
    }
}

// == Filter ==
/// Snapshot of a consumer's filter state.
///
/// Fields live in a `BTreeMap`, so iteration order is the sorted field
/// order no matter how the fields were inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    page: u32,
    per_page: u32,
    fields: BTreeMap<String, FilterValue>,
}

impl Filter {
    /// Creates a filter on page 1 with the given page size (minimum 1).
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            fields: BTreeMap::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn fields(&self) -> &BTreeMap<String, FilterValue> {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.fields.get(field)
    }

    /// Text form of a field, for resources that rewrite a filter before sending it.
    pub fn text(&self, field: &str) -> Option<String> {
        self.fields.get(field).map(ToString::to_string)
    }

    /// Builder-style field insertion, used when seeding a filter.
    ///
    /// Pagination names are ignored; use [`FilterStore::set_page`] and
    /// [`FilterPatch::per_page`] for those.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        let field = field.into();
        if !is_reserved(&field) {
            self.fields.insert(field, value.into());
        }
        self
    }

    /// Query parameters for the backend request.
    ///
    /// `page_size_param` names the page size parameter (`perpage` or `per_page`).
    pub fn to_query(&self, page_size_param: &str) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            (page_size_param.to_string(), self.per_page.to_string()),
        ];
        query.extend(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string())),
        );
        query
    }
}

// == Filter Patch ==
/// Partial update for [`FilterStore::set_filter`].
///
/// A field mapped to `None` is removed from the filter.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub fields: BTreeMap<String, Option<FilterValue>>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sets a field. Pagination names are ignored.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        let field = field.into();
        if !is_reserved(&field) {
            self.fields.insert(field, Some(value.into()));
        }
        self
    }

    pub fn clear(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), None);
        self
    }

    fn is_page_only(&self) -> bool {
        self.per_page.is_none() && self.fields.is_empty()
    }
}

// == Filter Store ==
/// Single-writer holder of a consumer's filter state.
#[derive(Debug, Clone)]
pub struct FilterStore {
    current: Filter,
}

impl FilterStore {
    pub fn new(per_page: u32) -> Self {
        Self {
            current: Filter::new(per_page),
        }
    }

    /// Builds a store from HTTP query parameters.
    ///
    /// `page` and `perpage`/`per_page` are parsed as positive integers; every
    /// other non-empty parameter becomes a text field.
    pub fn from_query(default_per_page: u32, params: &HashMap<String, String>) -> Result<Self> {
        let mut store = Self::new(default_per_page);
        let mut patch = FilterPatch::new();

        for (name, value) in params {
            let value = value.trim();
            match name.as_str() {
                "page" => {}
                "perpage" | "per_page" => patch.per_page = Some(parse_positive(name, value)?),
                _ if value.is_empty() => {}
                _ => {
                    patch
                        .fields
                        .insert(name.clone(), Some(FilterValue::Text(value.to_string())));
                }
            }
        }

        store.set_filter(patch);
        if let Some(page) = params.get("page") {
            store.set_page(parse_positive("page", page.trim())?);
        }
        Ok(store)
    }

    /// Current filter snapshot.
    pub fn filter(&self) -> &Filter {
        &self.current
    }

    // == Set Filter ==
    /// Merges a partial update.
    ///
    /// The page returns to 1 unless the patch carries nothing but a page.
    pub fn set_filter(&mut self, patch: FilterPatch) {
        if patch.is_page_only() {
            if let Some(page) = patch.page {
                self.set_page(page);
            }
            return;
        }

        if let Some(per_page) = patch.per_page {
            self.current.per_page = per_page.max(1);
        }
        for (name, value) in patch.fields {
            if is_reserved(&name) {
                continue;
            }
            match value {
                Some(value) => {
                    self.current.fields.insert(name, value);
                }
                None => {
                    self.current.fields.remove(&name);
                }
            }
        }
        self.current.page = 1;
    }

    // == Set Page ==
    /// Moves to page `page`, keeping every other field. `0` clamps to 1.
    pub fn set_page(&mut self, page: u32) {
        self.current.page = page.max(1);
    }
}

fn parse_positive(name: &str, value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| {
            DashboardError::Validation(format!("'{}' must be a positive integer", name))
        })
}
