//! Identity domain model
//!
//! The authenticated user as the FundOps API reports it. An identity
//! exists only while a session holds a valid token; it is never cached
//! across sign-ins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated user.
///
/// Identifiers are the API's opaque string ids, not local values. The
/// `is_superuser` flag is global and bypasses every per-organization
/// role check.
///
/// # Examples
///
/// ```
/// use fundops_org::Identity;
///
/// let user = Identity::new("66f1a9c0e4b0a1b2c3d4e5f6", "jdoe", "jdoe@meridian.example")
///     .with_name("Jordan", "Doe");
/// assert_eq!(user.full_name().as_deref(), Some("Jordan Doe"));
/// assert!(!user.is_superuser);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// API identifier for the user
    pub id: String,

    /// Login name
    pub username: String,

    /// Email address
    pub email: String,

    /// Given name
    pub first_name: Option<String>,

    /// Family name
    pub last_name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Whether the account is active; inactive accounts cannot sign in
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Global superuser flag
    #[serde(default)]
    pub is_superuser: bool,

    /// When the account was created
    pub created_at: Option<DateTime<Utc>>,

    /// When the account was last updated
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Identity {
    /// Creates an identity with the required fields.
    ///
    /// Optional fields start empty; the account is active and not a
    /// superuser.
    ///
    /// # Arguments
    ///
    /// * `id` - API identifier
    /// * `username` - Login name
    /// * `email` - Email address
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            phone: None,
            is_active: true,
            is_superuser: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the given and family names.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Mark the identity as a superuser.
    pub fn with_superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }

    /// Full name from the name parts, if any are set.
    ///
    /// # Returns
    ///
    /// `Some("First Last")`, a single part when only one is set, `None`
    /// when neither is.
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.to_string()),
            (None, Some(last)) => Some(last.to_string()),
            (None, None) => None,
        }
    }

    /// Name to show in the UI: full name when present, else the username.
    pub fn display_name(&self) -> String {
        self.full_name().unwrap_or_else(|| self.username.clone())
    }
}
