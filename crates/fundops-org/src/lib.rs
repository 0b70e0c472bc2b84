//! # FundOps Organization Model
//!
//! Identity, membership, and organization types for the FundOps back
//! office, shared by the API client and the session layer.
//!
//! ## Overview
//!
//! The fundops-org crate handles:
//! - **Identity**: The authenticated user, including the global
//!   superuser flag
//! - **Memberships**: The organizations the user belongs to and the role
//!   held in each
//! - **Organizations**: Full tenant records for operator screens
//! - **Selection**: The default rule for which organization a membership
//!   list lands on
//!
//! ## Architecture
//!
//! ```text
//! Identity
//!   └─ Membership ─→ organization_id / role / is_primary
//!        └─ select_default(list, persisted) ─→ current organization
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use fundops_org::{select_default, Membership};
//!
//! let memberships = vec![
//!     Membership::new("org-a", "Alpha Fund Services", "analyst"),
//!     Membership::new("org-b", "Bravo Partners", "admin").with_primary(),
//! ];
//!
//! let current = select_default(&memberships, None).unwrap();
//! assert_eq!(current.organization_id, "org-b");
//! assert!(current.is_admin());
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate is designed to work with:
//! - `fundops-rbac`: Capability grants per role name
//! - `fundops-api`: Fetches identities and memberships off the wire
//! - `fundops-session`: Holds the authenticated state and the current
//!   organization
//!
//! ## Feature Flags
//!
//! - `serde`: Serialization support (enabled by default)

pub mod identity;
pub mod membership;
pub mod organization;
pub mod selection;

// Re-export main types for convenience
pub use identity::Identity;
pub use membership::{Membership, ADMIN_ROLE};
pub use organization::Organization;
pub use selection::{find_by_organization, select_default};
