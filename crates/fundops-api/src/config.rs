//! Client configuration for the FundOps API.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults for local development.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the FundOps API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the API (e.g., "https://fundops.example.com").
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum attempts for transient read failures.
    pub max_retries: u32,
}

impl Default for ApiConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `FUNDOPS_API_URL`: API base URL (default: http://localhost:8000)
    /// - `FUNDOPS_API_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    /// - `FUNDOPS_API_MAX_RETRIES`: Attempts for transient failures (default: 3)
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            base_url: std::env::var("FUNDOPS_API_URL").unwrap_or(default.base_url),
            timeout_secs: std::env::var("FUNDOPS_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.timeout_secs),
            max_retries: std::env::var("FUNDOPS_API_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.max_retries),
        }
    }

    /// Create a configuration pointed at a specific base URL.
    ///
    /// Timeout and retry settings keep their defaults.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
