//! # FundOps API Client
//!
//! Typed REST client for the Fund Operations Admin API.
//!
//! ## Overview
//!
//! The fundops-api crate handles:
//! - **Boundary**: The [`FundOpsApi`] trait the session layer consumes,
//!   so tests and tools can substitute the transport
//! - **Transport**: [`RestClient`], a reqwest-based implementation with
//!   bearer authentication and backoff on transient read failures
//! - **Errors**: The [`ApiError`] taxonomy callers branch on
//! - **Configuration**: Environment-driven [`ApiConfig`]
//! - **Wire types**: Funds, investors, properties, allocations, role
//!   catalog records, and per-organization user listings
//!
//! ## Endpoints
//!
//! Authentication and session:
//! - `POST /api/v1/auth/login` (form-encoded username/password)
//! - `GET /api/v1/auth/me`
//! - `GET /api/v1/users/{id}/organizations`
//! - `POST /api/v1/auth/change-password`
//!
//! Organization-scoped collections:
//! - `GET /api/v1/funds/organization/{id}`
//! - `GET /api/v1/investors/organization/{id}`
//! - `GET /api/v1/properties/organization/{id}`
//! - `GET /api/v1/investor-funds/organization/{id}`
//! - `GET /api/v1/users/organization/{id}`
//!
//! Catalogs:
//! - `GET /api/v1/organizations/`
//! - `GET /api/v1/roles/`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fundops_api::{ApiConfig, FundOpsApi, RestClient};
//!
//! async fn example() -> Result<(), fundops_api::ApiError> {
//!     let client = RestClient::new(ApiConfig::from_env());
//!
//!     let token = client.authenticate("jdoe", "hunter2").await?;
//!     let me = client.current_identity(&token).await?;
//!     let memberships = client.memberships_for(&token, &me.id).await?;
//!
//!     for m in &memberships {
//!         println!("{} as {}", m.organization_name, m.role);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod types;

// Re-export main types
pub use client::{FundOpsApi, MembershipEntry, RestClient};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use retry::{with_retry_if, RetryConfig};
pub use types::{Fund, Investor, InvestorFund, OrganizationUser, Property, RoleRecord};
