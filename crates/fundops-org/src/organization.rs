//! Organization domain model
//!
//! The organization record as the FundOps API returns it. Ordinary users
//! see organizations only through their memberships; the full records
//! back the platform-operator screens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organization (tenant) record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// API identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Short code, unique per deployment when set
    pub code: Option<String>,

    /// Free-text description
    pub description: Option<String>,

    /// Postal address
    pub address: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Contact email
    pub email: Option<String>,

    /// Public website URL
    pub website: Option<String>,

    /// Whether the organization is active
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// When the record was created
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last updated
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Organization {
    /// Creates an organization with the required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: None,
            description: None,
            address: None,
            phone: None,
            email: None,
            website: None,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    /// Set the short code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Label for pickers: `"Name (CODE)"` when a code is set.
    pub fn label(&self) -> String {
        match &self.code {
            Some(code) => format!("{} ({})", self.name, code),
            None => self.name.clone(),
        }
    }
}
