//! HTTP Transport
//!
//! The seam between the executor and the wire. Production reads go through
//! [`HttpTransport`]; tests script responses behind the same trait.

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{DashboardError, Result};

// == Raw Response ==
/// Status and body of one backend answer, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

// == Transport Trait ==
/// Sends requests to the REST backend.
///
/// Only failures that produced no HTTP status are errors here; every status,
/// 4xx and 5xx included, comes back as a [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` with query parameters.
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<RawResponse>;

    /// Sends a write request with an optional JSON body.
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<RawResponse>;
}

// == Reqwest Transport ==
/// reqwest-backed transport with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTransport {
    /// Creates a transport rooted at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Backend API root, e.g. `https://api.example.com/api`
    /// * `token` - Bearer credential sent with every request, if any
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| DashboardError::Internal(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.api_base_url.clone(), config.api_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json");

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn dispatch(&self, builder: reqwest::RequestBuilder) -> Result<RawResponse> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<RawResponse> {
        debug!(path, params = query.len(), "GET");
        self.dispatch(self.request(Method::GET, path).query(query))
            .await
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<RawResponse> {
        debug!(path, method = %method, "write request");
        let builder = self.request(method, path);
        let builder = match body {
            Some(json) => builder.json(json),
            None => builder,
        };
        self.dispatch(builder).await
    }
}

fn transport_error(error: reqwest::Error) -> DashboardError {
    if error.is_timeout() {
        DashboardError::Transport(format!("request timed out: {}", error))
    } else {
        DashboardError::Transport(error.to_string())
    }
}
