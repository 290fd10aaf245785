//! Remote Fetch Executor
//!
//! Runs list reads with a bounded retry policy and classifies every backend
//! answer into data or a [`DashboardError`]. Writes go through
//! [`RemoteExecutor::execute`] and are attempted once.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::envelope::ErrorBody;
use super::{ApiEnvelope, CollectionPage, HttpTransport, RawResponse, Transport};
use crate::cache::Fetched;
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::query::Filter;
use crate::resources::Resource;

// == Retry Policy ==
/// Extra attempts after a retryable failure, with a fixed pause between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Single attempt.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.fetch_retries, config.retry_delay())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(200))
    }
}

// == Executor ==
pub struct RemoteExecutor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RemoteExecutor {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Executor over the reqwest transport described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport), RetryPolicy::from_config(config)))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    // == Fetch Page ==
    /// Fetches one page of `R` for `filter`.
    ///
    /// Transport failures and 5xx answers are retried up to
    /// `max_retries` times with the request unchanged. 4xx answers, an
    /// envelope with `success: false` and undecodable bodies fail at once.
    /// When every attempt was a server error and `R` opts in, an empty page
    /// marked as degraded is returned instead of the error.
    pub async fn fetch_page<R: Resource>(
        &self,
        filter: &Filter,
    ) -> Result<Fetched<CollectionPage<R::Item>>> {
        let query = R::query_params(filter)?;
        let mut retries = 0;
        let mut only_server_errors = true;

        loop {
            let error = match self.get_page::<R::Item>(R::ENDPOINT, &query).await {
                Ok(page) => {
                    page.is_consistent(R::ENDPOINT);
                    return Ok(Fetched::fresh(page));
                }
                Err(error) => error,
            };

            if !matches!(error, DashboardError::Server { .. }) {
                only_server_errors = false;
            }

            if error.is_retryable() && retries < self.policy.max_retries {
                retries += 1;
                warn!(
                    endpoint = R::ENDPOINT,
                    attempt = retries + 1,
                    error = %error,
                    "retrying fetch"
                );
                if !self.policy.delay.is_zero() {
                    tokio::time::sleep(self.policy.delay).await;
                }
                continue;
            }

            if only_server_errors && R::DEGRADE_ON_SERVER_ERROR {
                warn!(
                    endpoint = R::ENDPOINT,
                    error = %error,
                    "backend keeps failing; serving an empty page"
                );
                return Ok(Fetched::degraded(CollectionPage::empty()));
            }

            return Err(error);
        }
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<CollectionPage<T>> {
        let raw = self.transport.get(path, query).await?;
        open_envelope::<CollectionPage<T>>(path, raw)?
            .data
            .ok_or_else(|| DashboardError::Decode(format!("{} answered without data", path)))
    }

    // == Execute ==
    /// Sends a write once and opens its envelope. No retry, no degradation.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiEnvelope<Value>> {
        debug!(method = %method, path, "executing write");
        let raw = self.transport.send(method, path, body).await?;
        open_envelope(path, raw)
    }
}

/// Classifies a backend answer by status, then decodes the envelope.
fn open_envelope<T: DeserializeOwned>(path: &str, raw: RawResponse) -> Result<ApiEnvelope<T>> {
    let RawResponse { status, body } = raw;

    match status {
        200..=299 => {}
        400..=499 => {
            return Err(DashboardError::Client {
                status,
                message: ErrorBody::message_of(&body)
                    .unwrap_or_else(|| format!("{} rejected the request ({})", path, status)),
            })
        }
        500..=599 => {
            return Err(DashboardError::Server {
                status,
                message: ErrorBody::message_of(&body)
                    .unwrap_or_else(|| format!("{} failed", path)),
            })
        }
        other => {
            return Err(DashboardError::Decode(format!(
                "{} answered with unexpected status {}",
                path, other
            )))
        }
    }

    let envelope: ApiEnvelope<T> = serde_json::from_str(&body)
        .map_err(|e| DashboardError::Decode(format!("{}: {}", path, e)))?;

    if !envelope.success {
        return Err(DashboardError::Client {
            status,
            message: envelope
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| format!("{} did not accept the request", path)),
        });
    }

    Ok(envelope)
}
