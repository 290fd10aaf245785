//! Fetch Key Derivation
//!
//! Canonical cache keys for filtered collection reads.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::filter::{Filter, FilterValue};

// == Fetch Key ==
/// Cache key for one page of one collection.
///
/// `namespace` tags the entry for invalidation; `canonical` is the sorted
/// JSON form of every filter field, `page` and `perpage` included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchKey {
    namespace: String,
    canonical: String,
}

impl FetchKey {
    /// Key for a filter under `namespace`.
    pub fn derive(namespace: &str, filter: &Filter) -> Self {
        let mut canonical: BTreeMap<&str, Value> = filter
            .fields()
            .iter()
            .map(|(name, value)| (name.as_str(), filter_value_json(value)))
            .collect();
        canonical.insert("page", Value::from(filter.page()));
        canonical.insert("perpage", Value::from(filter.per_page()));

        Self {
            namespace: namespace.to_string(),
            // BTreeMap serializes in key order; serializing a map of JSON
            // scalars cannot fail.
            canonical: serde_json::to_string(&canonical).unwrap_or_default(),
        }
    }

    /// Key with an already canonical body, for namespaces that are not paged lists.
    pub fn raw(namespace: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            canonical: canonical.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// True when this key belongs to `namespace`.
    pub fn is_under(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.canonical)
    }
}

/// Derives the cache key for `filter` under `namespace`.
pub fn derive_key(namespace: &str, filter: &Filter) -> FetchKey {
    FetchKey::derive(namespace, filter)
}

fn filter_value_json(value: &FilterValue) -> Value {
    match value {
        FilterValue::Flag(b) => Value::Bool(*b),
        FilterValue::Integer(n) => Value::from(*n),
        FilterValue::Text(s) => Value::String(s.clone()),
    }
}
