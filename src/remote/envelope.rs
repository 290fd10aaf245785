//! Backend Response Envelope
//!
//! Every backend response is wrapped as `{success, message, data}`; list
//! endpoints carry `{list, meta}` inside `data`.

use serde::{Deserialize, Serialize};
use tracing::warn;

fn succeeded() -> bool {
    true
}

// == Envelope ==
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Error bodies only need the message.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Backend `message` from an error body, if it has one.
    pub(crate) fn message_of(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
    }
}

// == Page Meta ==
/// Pagination block of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default, alias = "page_size", alias = "per_page")]
    pub pagesize: u32,
}

// == Collection Page ==
/// One page of a remote collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollectionPage<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> CollectionPage<T> {
    /// The page served when a degradable read keeps failing server-side.
    pub fn empty() -> Self {
        Self {
            list: Vec::new(),
            meta: PageMeta::default(),
        }
    }

    /// Checks `list.len() <= pagesize` and `current_page <= last_page`.
    ///
    /// The backend stays the authority, so violations are only logged.
    pub fn is_consistent(&self, endpoint: &str) -> bool {
        let mut consistent = true;

        if self.meta.pagesize > 0 && self.list.len() > self.meta.pagesize as usize {
            warn!(
                endpoint,
                items = self.list.len(),
                pagesize = self.meta.pagesize,
                "page holds more items than its page size"
            );
            consistent = false;
        }

        if self.meta.current_page > self.meta.last_page.max(1) {
            warn!(
                endpoint,
                current_page = self.meta.current_page,
                last_page = self.meta.last_page,
                "current page is past the last page"
            );
            consistent = false;
        }

        consistent
    }
}
