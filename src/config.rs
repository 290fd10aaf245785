//! Configuration Module
//!
//! Handles loading gateway, cache and backend settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, without a trailing slash
    pub api_base_url: String,
    /// Bearer credential forwarded to the backend
    pub api_token: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds a cached page answers without a refetch
    pub stale_window: u64,
    /// Seconds an unused entry is retained before the sweeper drops it
    pub retention: u64,
    /// Maximum number of cached pages
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Additional attempts after a retryable read failure
    pub fetch_retries: u32,
    /// Pause between read attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Backend base URL (default: http://localhost:8000/api)
    /// - `API_TOKEN` - Bearer token (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STALE_WINDOW_SECS` - Freshness window (default: 60)
    /// - `RETENTION_SECS` - Retention window (default: 300)
    /// - `MAX_ENTRIES` - Maximum cached pages (default: 1000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 5)
    /// - `FETCH_RETRIES` - Extra read attempts (default: 2)
    /// - `RETRY_DELAY_MS` - Delay between attempts (default: 200)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_base_url),
            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            stale_window: parse_var("STALE_WINDOW_SECS", defaults.stale_window),
            retention: parse_var("RETENTION_SECS", defaults.retention),
            max_entries: parse_var("MAX_ENTRIES", defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval),
            fetch_retries: parse_var("FETCH_RETRIES", defaults.fetch_retries),
            retry_delay_ms: parse_var("RETRY_DELAY_MS", defaults.retry_delay_ms),
        }
    }

    pub fn stale_window(&self) -> Duration {
        Duration::from_secs(self.stale_window)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            api_token: None,
            server_port: 3000,
            stale_window: 60,
            retention: 300,
            max_entries: 1000,
            cleanup_interval: 5,
            fetch_retries: 2,
            retry_delay_ms: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert!(config.api_token.is_none());
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.stale_window(), Duration::from_secs(60));
        assert_eq!(config.retention(), Duration::from_secs(300));
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.fetch_retries, 2);
        assert_eq!(config.retry_delay(), Duration::from_millis(200));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "API_BASE_URL",
            "API_TOKEN",
            "SERVER_PORT",
            "STALE_WINDOW_SECS",
            "RETENTION_SECS",
            "MAX_ENTRIES",
            "CLEANUP_INTERVAL",
            "FETCH_RETRIES",
            "RETRY_DELAY_MS",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.stale_window, 60);
        assert_eq!(config.cleanup_interval, 5);
        assert_eq!(config.fetch_retries, 2);
    }
}
