//! # Built-in Role Grants
//!
//! Default capability grants for the role names the FundOps API ships
//! with. Custom roles defined per tenant carry their grants on the role
//! record itself; the tables here cover the seeded catalog roles
//! (`admin`, `fund_manager`, `analyst`, `viewer`) and the fund-operations
//! roles (`cfo`, `fund_administrator`, `external_auditor`, ...).
//!
//! These grants drive UI gating only. Whether an operation is actually
//! permitted is always decided server-side.

use crate::capability::Capability;
use crate::permissions::PermissionSet;

/// Role names with built-in grants, catalog roles first.
pub const BUILTIN_ROLES: &[&str] = &[
    "admin",
    "fund_manager",
    "analyst",
    "viewer",
    "super_admin",
    "cfo",
    "general_partner",
    "fund_administrator",
    "fund_accountant",
    "external_auditor",
    "legal_compliance",
    "investor",
    "manager",
    "member",
];

/// Look up the built-in grants for a role name.
///
/// # Arguments
///
/// * `role` - Role name as carried on a membership (case-insensitive)
///
/// # Returns
///
/// `Some(PermissionSet)` for known role names (possibly empty, as for
/// `investor`), `None` for roles the client has never heard of.
///
/// # Example
///
/// ```
/// use fundops_rbac::{builtin_grants, Capability};
///
/// let analyst = builtin_grants("analyst").unwrap();
/// assert!(analyst.grants(Capability::ViewAllData));
/// assert!(!analyst.grants(Capability::ManageFunds));
///
/// assert!(builtin_grants("ANALYST").is_some());
/// assert!(builtin_grants("head_of_snacks").is_none());
/// ```
pub fn builtin_grants(role: &str) -> Option<PermissionSet> {
    use Capability::*;

    let grants: &[Capability] = match role.to_lowercase().as_str() {
        "super_admin" => &[
            ManageOrganizations,
            ManageUsers,
            ManageFunds,
            ManageInvestors,
            ManageProperties,
            ViewAllData,
            ViewFinancials,
            ApproveTransactions,
        ],
        // The seeded admin role manages everything inside its tenant but
        // not the organization records themselves.
        "admin" => &[
            ManageUsers,
            ManageFunds,
            ManageInvestors,
            ManageProperties,
            ViewAllData,
            ViewFinancials,
            ApproveTransactions,
        ],
        "cfo" | "general_partner" | "fund_manager" => &[
            ManageFunds,
            ManageInvestors,
            ManageProperties,
            ViewAllData,
            ViewFinancials,
            ApproveTransactions,
        ],
        "fund_administrator" => &[
            ManageFunds,
            ManageInvestors,
            ManageProperties,
            ViewAllData,
            ViewFinancials,
        ],
        "fund_accountant" | "analyst" | "external_auditor" | "legal_compliance" => {
            &[ViewAllData, ViewFinancials]
        }
        "viewer" => &[ViewAllData],
        // Known roles with no standing grants. Investors see only their
        // own records, which the server scopes without a capability.
        "investor" | "manager" | "member" => &[],
        _ => return None,
    };

    Some(grants.iter().copied().collect())
}
