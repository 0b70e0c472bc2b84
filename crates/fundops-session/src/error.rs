//! Session error types.

use fundops_api::ApiError;
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation needs an authenticated session and there is none.
    #[error("Not signed in")]
    NotAuthenticated,

    /// A selection named an organization outside the membership list.
    #[error("Not a member of organization {organization_id}")]
    InvalidSelection {
        /// The rejected organization id.
        organization_id: String,
    },

    /// The session store could not be read or written.
    #[error("Session store error: {0}")]
    Store(String),

    /// The event channel closed with no senders left.
    #[error("Event channel closed")]
    ChannelClosed,

    /// An API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// Whether the error means the credentials or token were rejected.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            SessionError::Api(e) => e.is_auth_failure(),
            SessionError::NotAuthenticated => true,
            _ => false,
        }
    }
}
