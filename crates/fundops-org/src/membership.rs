//! Membership domain model
//!
//! A membership links the signed-in user to one organization and carries
//! the role that scopes what they can do there. The membership list is
//! the source of truth for the organization picker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The organization admin role name. Comparison is case-insensitive.
pub const ADMIN_ROLE: &str = "admin";

/// One organization the current user belongs to.
///
/// Role names are free text owned by the server; clients compare them
/// case-insensitively and never enumerate them. The optional `role_id`
/// points at the role catalog record when the tenant uses custom roles,
/// and is carried for display purposes only.
///
/// # Examples
///
/// ```
/// use fundops_org::Membership;
///
/// let m = Membership::new("org-1", "Meridian Capital", "Admin");
/// assert!(m.is_admin());
///
/// let m = Membership::new("org-2", "Harbor Point", "analyst");
/// assert!(!m.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// Organization the membership is in
    pub organization_id: String,

    /// Organization name, for display
    pub organization_name: String,

    /// Short organization code, if the tenant uses codes
    pub organization_code: Option<String>,

    /// Role name within the organization
    pub role: String,

    /// Role catalog record id, when the role is catalog-backed
    pub role_id: Option<String>,

    /// Whether this is the user's primary organization
    #[serde(default)]
    pub is_primary: bool,

    /// When the user joined the organization
    pub joined_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// Creates a membership with the required fields.
    ///
    /// # Arguments
    ///
    /// * `organization_id` - Organization identifier
    /// * `organization_name` - Display name
    /// * `role` - Role name within the organization
    pub fn new(
        organization_id: impl Into<String>,
        organization_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            organization_id: organization_id.into(),
            organization_name: organization_name.into(),
            organization_code: None,
            role: role.into(),
            role_id: None,
            is_primary: false,
            joined_at: None,
        }
    }

    /// Mark this as the user's primary organization.
    pub fn with_primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    /// Set the organization code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.organization_code = Some(code.into());
        self
    }

    /// Set the role catalog record id.
    pub fn with_role_id(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }

    /// Set the join timestamp.
    pub fn with_joined_at(mut self, joined_at: DateTime<Utc>) -> Self {
        self.joined_at = Some(joined_at);
        self
    }

    /// Whether the role makes the user an organization admin.
    ///
    /// The check is the role name compared case-insensitively to
    /// [`ADMIN_ROLE`]. Global superusers are handled a level up and do
    /// not need an admin membership.
    ///
    /// # Returns
    ///
    /// `true` for `"admin"`, `"Admin"`, `"ADMIN"`; `false` for anything
    /// else, including roles that merely contain the word.
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case(ADMIN_ROLE)
    }

    /// Whether the membership carries the given role name.
    ///
    /// # Arguments
    ///
    /// * `role` - Role name to compare, case-insensitively
    pub fn has_role(&self, role: &str) -> bool {
        self.role.eq_ignore_ascii_case(role)
    }
}
