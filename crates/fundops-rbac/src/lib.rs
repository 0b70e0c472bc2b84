//! # FundOps RBAC
//!
//! Capability flags and permission sets for the FundOps back office.
//!
//! ## Overview
//!
//! The fundops-rbac crate handles:
//! - **Capabilities**: The boolean permission switches the API attaches to
//!   roles (`can_manage_funds`, `can_view_financials`, ...)
//! - **Permission Sets**: Collections of granted capabilities, serialized
//!   as the API's flat flag maps
//! - **Built-in Grants**: Default capability sets for the seeded role
//!   names (`admin`, `fund_manager`, `analyst`, `viewer`) and the
//!   fund-operations roles (`cfo`, `fund_administrator`, ...)
//!
//! Everything here drives UI gating: hiding an Approve button the user's
//! role could never use, graying out management pages for analysts. The
//! server re-checks every operation; nothing in this crate is an access
//! control decision by itself.
//!
//! ## Usage
//!
//! ```rust
//! use fundops_rbac::{builtin_grants, Capability, PermissionSet};
//!
//! // Grants for a membership's role name
//! let grants = builtin_grants("fund_manager").unwrap_or_default();
//! assert!(grants.grants(Capability::ManageFunds));
//! assert!(!grants.grants(Capability::ManageUsers));
//!
//! // Custom roles carry their grants on the role record
//! let custom: PermissionSet = serde_json::from_str(
//!     r#"{"can_view_all_data": true, "can_view_financials": true}"#,
//! ).unwrap();
//! assert!(custom.grants(Capability::ViewFinancials));
//! ```
//!
//! ## Integration with fundops-org
//!
//! Whether a membership is an organization admin is a separate question
//! answered by `fundops-org` (role name compared to `"admin"`); the
//! capability tables here never override that check.

pub mod capability;
pub mod permissions;
pub mod roles;

// Re-export main types for convenience
pub use capability::Capability;
pub use permissions::PermissionSet;
pub use roles::{builtin_grants, BUILTIN_ROLES};
