//! # Capabilities
//!
//! Defines the capability switches a role can grant.
//! Capabilities mirror the boolean permission flags carried on role
//! records by the FundOps API (`can_manage_funds`, `can_view_financials`,
//! and so on).

use serde::{Deserialize, Serialize};

/// A single capability switch that a role may grant.
///
/// Capabilities fall into three groups:
/// - **Manage**: create/update/delete a resource family
/// - **View**: read access beyond the caller's own records
/// - **Approve**: sign off on pending transactions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Administer organizations themselves.
    ///
    /// Reserved for platform operators; no seeded tenant role grants it.
    #[serde(rename = "can_manage_organizations")]
    ManageOrganizations,

    /// Manage user accounts and organization memberships.
    #[serde(rename = "can_manage_users")]
    ManageUsers,

    /// Create and maintain funds.
    #[serde(rename = "can_manage_funds")]
    ManageFunds,

    /// Create and maintain investor records and commitments.
    #[serde(rename = "can_manage_investors")]
    ManageInvestors,

    /// Create and maintain property records.
    #[serde(rename = "can_manage_properties")]
    ManageProperties,

    /// View all data in the organization, not only own records.
    #[serde(rename = "can_view_all_data")]
    ViewAllData,

    /// View financial figures (NAV, commitments, distributions).
    #[serde(rename = "can_view_financials")]
    ViewFinancials,

    /// Approve pending transactions.
    #[serde(rename = "can_approve_transactions")]
    ApproveTransactions,
}

impl Capability {
    /// Get the wire key for the capability.
    ///
    /// # Returns
    ///
    /// The `can_*` key used in API permission maps.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageOrganizations => "can_manage_organizations",
            Capability::ManageUsers => "can_manage_users",
            Capability::ManageFunds => "can_manage_funds",
            Capability::ManageInvestors => "can_manage_investors",
            Capability::ManageProperties => "can_manage_properties",
            Capability::ViewAllData => "can_view_all_data",
            Capability::ViewFinancials => "can_view_financials",
            Capability::ApproveTransactions => "can_approve_transactions",
        }
    }

    /// Parse a capability from its wire key.
    ///
    /// # Arguments
    ///
    /// * `s` - Key to parse (case-insensitive; the `can_` prefix is optional)
    ///
    /// # Returns
    ///
    /// `Some(Capability)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use fundops_rbac::Capability;
    ///
    /// assert_eq!(Capability::parse("can_manage_funds"), Some(Capability::ManageFunds));
    /// assert_eq!(Capability::parse("manage_funds"), Some(Capability::ManageFunds));
    /// assert_eq!(Capability::parse("CAN_VIEW_FINANCIALS"), Some(Capability::ViewFinancials));
    /// assert_eq!(Capability::parse("launch_rockets"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let key = lower.strip_prefix("can_").unwrap_or(&lower);
        match key {
            "manage_organizations" => Some(Capability::ManageOrganizations),
            "manage_users" => Some(Capability::ManageUsers),
            "manage_funds" => Some(Capability::ManageFunds),
            "manage_investors" => Some(Capability::ManageInvestors),
            "manage_properties" => Some(Capability::ManageProperties),
            "view_all_data" => Some(Capability::ViewAllData),
            "view_financials" => Some(Capability::ViewFinancials),
            "approve_transactions" => Some(Capability::ApproveTransactions),
            _ => None,
        }
    }

    /// Get all capabilities, in wire order.
    ///
    /// # Returns
    ///
    /// A vector containing every capability.
    pub fn all() -> Vec<Self> {
        vec![
            Capability::ManageOrganizations,
            Capability::ManageUsers,
            Capability::ManageFunds,
            Capability::ManageInvestors,
            Capability::ManageProperties,
            Capability::ViewAllData,
            Capability::ViewFinancials,
            Capability::ApproveTransactions,
        ]
    }

    /// Human-readable name for UI labels.
    ///
    /// # Returns
    ///
    /// A display name such as `"Manage Funds"`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Capability::ManageOrganizations => "Manage Organizations",
            Capability::ManageUsers => "Manage Users",
            Capability::ManageFunds => "Manage Funds",
            Capability::ManageInvestors => "Manage Investors",
            Capability::ManageProperties => "Manage Properties",
            Capability::ViewAllData => "View All Data",
            Capability::ViewFinancials => "View Financials",
            Capability::ApproveTransactions => "Approve Transactions",
        }
    }

    /// Check if this is a view-only capability.
    ///
    /// View capabilities never permit modifying data.
    ///
    /// # Returns
    ///
    /// `true` for the `View*` capabilities, `false` otherwise
    pub fn is_view(&self) -> bool {
        matches!(self, Capability::ViewAllData | Capability::ViewFinancials)
    }

    /// Check if this capability permits modifying data.
    ///
    /// # Returns
    ///
    /// `true` for the `Manage*` and approval capabilities
    pub fn is_write(&self) -> bool {
        !self.is_view()
    }
}
