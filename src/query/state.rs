//! Per-key fetch status.

use serde::Serialize;

use crate::error::DashboardError;

/// Lifecycle of one fetch key as seen by its consumers.
///
/// `Idle → Loading → (Success | Error)`; a stale `Success` and a retried
/// `Error` both go back through `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchStatus {
    /// Nothing cached, nothing in flight
    Idle,
    /// A network call for the key is in flight
    Loading,
    /// A result is cached; `fresh` is false once the stale window passed
    Success { fresh: bool },
    /// The last attempt failed
    Error { message: String, retryable: bool },
}

impl FetchStatus {
    pub fn from_error(error: &DashboardError) -> Self {
        FetchStatus::Error {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_error() {
        let status = FetchStatus::from_error(&DashboardError::Transport("reset".into()));
        assert!(!status.is_loading());
        assert_eq!(
            status,
            FetchStatus::Error {
                message: "Transport error: reset".to_string(),
                retryable: true,
            }
        );
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_string(&FetchStatus::Success { fresh: true }).unwrap();
        assert_eq!(json, r#"{"state":"success","fresh":true}"#);
    }
}
