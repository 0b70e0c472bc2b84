//! Wire types for the FundOps API.
//!
//! Response records for the organization-scoped collections pages render:
//! funds, investors, properties, allocations, role catalog entries, and
//! per-organization user listings. Field sets mirror the API schemas;
//! identifiers are opaque strings.

use chrono::{DateTime, Utc};
use fundops_rbac::PermissionSet;
use serde::{Deserialize, Serialize};

/// A fund record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    /// API identifier.
    pub id: String,

    /// Fund name.
    pub name: String,

    /// Fund type (e.g., "private_equity", "real_estate").
    pub fund_type: Option<String>,

    /// Target fund size.
    pub target_size: Option<f64>,

    /// Current committed size.
    pub current_size: Option<f64>,

    /// ISO currency code.
    pub currency: Option<String>,

    /// Lifecycle status (e.g., "active", "closed").
    pub status: Option<String>,

    /// Free-text description.
    pub description: Option<String>,

    /// Owning organization.
    pub organization_id: Option<String>,

    /// When the record was created.
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// An investor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investor {
    /// API identifier.
    pub id: String,

    /// Investor name.
    pub name: String,

    /// Contact email.
    pub email: Option<String>,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Investor type (e.g., "institutional", "individual").
    pub investor_type: Option<String>,

    /// Total committed amount.
    pub commitment_amount: Option<f64>,

    /// Amount funded so far.
    pub funded_amount: Option<f64>,

    /// Owning organization.
    pub organization_id: Option<String>,

    /// Primary fund, when the investor is single-fund.
    pub fund_id: Option<String>,

    /// Lifecycle status.
    pub status: Option<String>,

    /// Postal address.
    pub address: Option<String>,

    /// City.
    pub city: Option<String>,

    /// State or region.
    pub state: Option<String>,

    /// Country.
    pub country: Option<String>,

    /// Whether the record is active.
    pub is_active: Option<bool>,

    /// When the record was created.
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A property record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// API identifier.
    pub id: String,

    /// Property name.
    pub name: String,

    /// Postal address.
    pub address: Option<String>,

    /// Property type (e.g., "office", "residential").
    pub property_type: Option<String>,

    /// Purchase price.
    pub acquisition_price: Option<f64>,

    /// Most recent valuation.
    pub current_value: Option<f64>,

    /// When the property was acquired.
    pub acquisition_date: Option<DateTime<Utc>>,

    /// Owning fund.
    pub fund_id: Option<String>,

    /// Lifecycle status.
    pub status: Option<String>,

    /// Square footage.
    pub square_footage: Option<f64>,

    /// Free-text description.
    pub description: Option<String>,

    /// When the record was created.
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// An investor-to-fund allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorFund {
    /// API identifier.
    pub id: String,

    /// Investor side of the allocation.
    pub investor_id: String,

    /// Fund side of the allocation.
    pub fund_id: String,

    /// Percentage of the investor's commitment allocated to this fund.
    pub allocation_percentage: Option<f64>,

    /// Amount committed to this fund.
    pub commitment_amount: Option<f64>,

    /// Amount funded to this fund so far.
    pub funded_amount: Option<f64>,

    /// Lifecycle status.
    pub status: Option<String>,

    /// When the record was created.
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A role catalog record.
///
/// Tenants can define custom roles; the `permissions` map carries the
/// capability grants, and `is_system` marks seeded roles that cannot be
/// edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// API identifier, referenced by membership `role_id`.
    pub id: String,

    /// Machine name (e.g., "fund_manager").
    pub name: String,

    /// Human-readable name (e.g., "Fund Manager").
    pub display_name: String,

    /// Free-text description.
    pub description: Option<String>,

    /// Capability grants for the role.
    pub permissions: Option<PermissionSet>,

    /// Whether this is a seeded system role.
    pub is_system: Option<bool>,

    /// Whether the role is active.
    pub is_active: Option<bool>,

    /// When the record was created.
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl RoleRecord {
    /// The role's grants, empty when the record carries none.
    pub fn grants(&self) -> PermissionSet {
        self.permissions.clone().unwrap_or_default()
    }
}

/// A user listed within an organization, with their role there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationUser {
    /// API identifier for the user.
    pub id: String,

    /// Email address.
    pub email: Option<String>,

    /// Login name.
    pub username: Option<String>,

    /// Given name.
    pub first_name: Option<String>,

    /// Family name.
    pub last_name: Option<String>,

    /// Contact phone number.
    pub phone: Option<String>,

    /// Whether the account is active.
    pub is_active: Option<bool>,

    /// Role within the organization.
    pub role: Option<String>,

    /// Whether this organization is the user's primary.
    pub is_primary: Option<bool>,

    /// When the user joined the organization.
    pub joined_at: Option<DateTime<Utc>>,
}
