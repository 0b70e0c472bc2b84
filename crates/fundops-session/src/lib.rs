//! # FundOps Session
//!
//! Session lifecycle and organization scoping for FundOps client
//! applications, shared across the admin desktop and operations
//! consoles.
//!
//! ## Overview
//!
//! The fundops-session crate handles:
//! - **Sessions**: Sign-in, restore, refresh, and sign-out against the
//!   FundOps API, with the access token and profile held in memory
//! - **Tenancy**: Tracking which of the user's organizations is
//!   selected, persisting the choice, and reconciling it whenever the
//!   membership list changes
//! - **Events**: A broadcast channel of [`SessionEvent`]s so pages
//!   react to sign-outs and organization switches instead of polling
//! - **Scopes**: [`OrgScope`] guards that let pages drop fetch results
//!   that raced a selection change
//! - **Persistence**: Pluggable [`SessionStore`] backends, in-memory
//!   for tests and a `0600` home-directory file for real clients
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use fundops_api::RestClient;
//! use fundops_session::{FileStore, SessionContext, SessionEvent};
//!
//! # async fn run() {
//! let api = Arc::new(RestClient::from_env());
//! let store = Arc::new(FileStore::from_home().unwrap());
//! let session = SessionContext::new(api, store);
//!
//! // Pick up a previous session, or sign in fresh.
//! if !session.restore().await {
//!     session.login("jdoe", "s3cret").await.unwrap();
//! }
//!
//! let org = session.current_organization().unwrap();
//! println!("operating as {}", org.organization_name);
//!
//! // React to organization switches and sign-outs.
//! let mut events = session.subscribe();
//! while let Ok(event) = events.recv().await {
//!     match event {
//!         SessionEvent::OrganizationChanged { .. } => { /* refetch scoped data */ }
//!         SessionEvent::SignedOut => break,
//!         _ => {}
//!     }
//! }
//! # }
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate integrates with:
//! - `fundops-api`: The REST client the session drives
//! - `fundops-org`: Identity and membership types
//! - `fundops-rbac`: Capability sets for UI gating

pub mod context;
pub mod error;
pub mod events;
pub mod manager;
pub mod scope;
pub mod store;
pub mod tenancy;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use context::SessionContext;
pub use error::{SessionError, SessionResult};
pub use events::{SessionEvent, SessionEvents};
pub use manager::SessionManager;
pub use scope::OrgScope;
pub use store::{FileStore, MemoryStore, SessionStore, ACCESS_TOKEN_KEY, SELECTED_ORG_KEY};
pub use tenancy::TenancySelector;
