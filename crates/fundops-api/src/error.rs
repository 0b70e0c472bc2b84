//! Error types for API operations
//!
//! This module defines the error taxonomy every API call resolves into.
//! Callers branch on the variant, never on status codes or message text.

use thiserror::Error;

/// API error types.
///
/// These errors cover credential failures, expired or missing tokens,
/// transport problems, and malformed responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Username or password was rejected by the login endpoint
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Token is missing, expired, or revoked
    #[error("Not authenticated")]
    Unauthorized,

    /// Transport-level failure (connect, timeout, TLS)
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Check if this error means the session's credentials are no good.
    ///
    /// Auth failures are terminal for the current token: the session
    /// layer signs out instead of retrying.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::InvalidCredentials | ApiError::Unauthorized)
    }

    /// Check if this error is worth retrying.
    ///
    /// Transport failures and gateway errors usually clear on their own;
    /// everything else reflects a request that would fail again.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Api { status, .. } => matches!(status, 502 | 503 | 504),
            _ => false,
        }
    }
}
