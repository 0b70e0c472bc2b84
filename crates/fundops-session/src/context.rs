//! The session facade page-level code talks to.
//!
//! [`SessionContext`] owns the session manager and the tenancy selector
//! and keeps their ordering straight: organization selection is
//! re-derived strictly after a membership commit, never from a
//! half-hydrated session. It also publishes [`SessionEvent`]s and hands
//! out [`OrgScope`]s so pages can drop fetch results that raced a
//! selection change.

use std::sync::Arc;

use fundops_api::FundOpsApi;
use fundops_org::{find_by_organization, Identity, Membership};
use fundops_rbac::{builtin_grants, PermissionSet};
use tracing::instrument;

use crate::error::{SessionError, SessionResult};
use crate::events::{EventBroadcaster, SessionEvent, SessionEvents};
use crate::manager::SessionManager;
use crate::scope::{OrgScope, ScopeTracker};
use crate::store::SessionStore;
use crate::tenancy::TenancySelector;

/// Capacity of the session event channel. Slow subscribers that fall
/// further behind than this skip ahead rather than block publishers.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Single entry point for session state, organization scoping, and
/// permission checks.
///
/// Constructed once per client process and shared behind an [`Arc`].
/// Pages read through the accessors, mutate through `login` / `logout`
/// / `select_organization`, and subscribe for change notifications
/// instead of polling.
pub struct SessionContext {
    api: Arc<dyn FundOpsApi>,
    manager: Arc<SessionManager>,
    selector: TenancySelector,
    events: EventBroadcaster,
    scopes: ScopeTracker,
}

impl SessionContext {
    /// Wire a context over an API client and a session store.
    pub fn new(api: Arc<dyn FundOpsApi>, store: Arc<dyn SessionStore>) -> Self {
        let manager = Arc::new(SessionManager::new(api.clone(), store.clone()));
        let selector = TenancySelector::new(manager.clone(), store);

        Self {
            api,
            manager,
            selector,
            events: EventBroadcaster::new(EVENT_CHANNEL_CAPACITY),
            scopes: ScopeTracker::new(),
        }
    }

    // ==================== Mutators ====================

    /// Sign in and settle the default organization.
    ///
    /// On success the membership list is hydrated, the organization
    /// selection reconciled, and `SignedIn` plus `OrganizationChanged`
    /// published, in that order. On failure nothing changes and the
    /// error carries a displayable message.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> SessionResult<()> {
        self.manager.login(username, password).await?;
        if self.manager.is_authenticated() {
            self.handle_signed_in();
        }
        Ok(())
    }

    /// Rebuild the session from persisted state.
    ///
    /// Call once at startup. A failed restore settles to signed-out
    /// without surfacing an error.
    ///
    /// # Returns
    ///
    /// `true` if a session was restored.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> bool {
        let was_authenticated = self.manager.is_authenticated();
        let restored = self.manager.restore().await;

        if restored {
            self.handle_signed_in();
        } else if was_authenticated && !self.manager.is_authenticated() {
            self.handle_auto_sign_out();
        }
        restored
    }

    /// Re-fetch identity and memberships, keeping the session live
    /// while the refresh is in flight.
    ///
    /// Publishes `MembershipsRefreshed`; if the reconciled selection
    /// moved, also `OrganizationChanged`. A failed refresh signs the
    /// session out the same way a failed restore does.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> bool {
        let was_authenticated = self.manager.is_authenticated();
        let refreshed = self.manager.refresh().await;

        if refreshed {
            let before = self.selector.current_organization_id();
            let after = self
                .selector
                .reconcile()
                .map(|membership| membership.organization_id);

            self.events.emit(SessionEvent::MembershipsRefreshed);
            if before != after {
                self.scopes.advance();
                self.events.emit(SessionEvent::OrganizationChanged {
                    organization_id: after,
                });
            }
        } else if was_authenticated && !self.manager.is_authenticated() {
            self.handle_auto_sign_out();
        }
        refreshed
    }

    /// Sign out explicitly.
    ///
    /// Clears the session, the persisted token, and the persisted
    /// organization choice, then publishes `SignedOut`.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.manager.logout();
        self.selector.clear();
        self.scopes.advance();
        self.events.emit(SessionEvent::SignedOut);
    }

    /// Switch to another of the user's organizations.
    ///
    /// Publishes `OrganizationChanged` and invalidates outstanding
    /// scopes, unless the organization was already selected.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidSelection`] when the id is not in the
    /// membership list.
    pub fn select_organization(&self, organization_id: &str) -> SessionResult<Membership> {
        let before = self.selector.current_organization_id();
        let selected = self.selector.select(organization_id)?;

        if before.as_deref() != Some(organization_id) {
            self.scopes.advance();
            self.events.emit(SessionEvent::OrganizationChanged {
                organization_id: Some(selected.organization_id.clone()),
            });
        }
        Ok(selected)
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotAuthenticated`] without a session; API
    /// rejections (wrong current password) pass through.
    #[instrument(skip(self, current, new))]
    pub async fn change_password(&self, current: &str, new: &str) -> SessionResult<()> {
        let token = self
            .manager
            .access_token()
            .ok_or(SessionError::NotAuthenticated)?;
        self.api.change_password(&token, current, new).await?;
        Ok(())
    }

    // ==================== Read surface ====================

    /// The authenticated identity, if any.
    pub fn identity(&self) -> Option<Identity> {
        self.manager.identity()
    }

    /// The membership list, shared. Empty when signed out.
    pub fn memberships(&self) -> Arc<[Membership]> {
        self.manager.memberships()
    }

    /// The selected organization's membership, if any.
    pub fn current_organization(&self) -> Option<Membership> {
        self.selector.current()
    }

    /// The bearer token for authenticated API calls, if signed in.
    pub fn access_token(&self) -> Option<String> {
        self.manager.access_token()
    }

    /// Whether a hydrated session is present.
    pub fn is_authenticated(&self) -> bool {
        self.manager.is_authenticated()
    }

    /// True while a sign-in or restore is settling. Selection settles
    /// in the same call that commits hydration, so when this turns
    /// false the default organization is already in place.
    pub fn is_loading(&self) -> bool {
        self.manager.is_restoring()
    }

    /// Subscribe to session change events.
    pub fn subscribe(&self) -> SessionEvents {
        self.events.subscribe()
    }

    // ==================== Permission helpers ====================

    /// Whether the signed-in user is a global superuser.
    pub fn is_superuser(&self) -> bool {
        self.manager
            .identity()
            .map(|identity| identity.is_superuser)
            .unwrap_or(false)
    }

    /// Whether the user administers the given organization: superuser,
    /// or membership role there equal to `admin` ignoring case.
    pub fn is_admin_of(&self, organization_id: &str) -> bool {
        if self.is_superuser() {
            return true;
        }
        let memberships = self.manager.memberships();
        find_by_organization(&memberships, organization_id)
            .map(|membership| membership.is_admin())
            .unwrap_or(false)
    }

    /// Capabilities to gate UI affordances with for an organization.
    ///
    /// Superusers get every capability; otherwise the built-in grants
    /// for the membership's role name, or nothing for unknown roles.
    /// This is display gating only; the service re-checks every write.
    pub fn capabilities_for(&self, organization_id: &str) -> PermissionSet {
        if self.is_superuser() {
            return PermissionSet::full();
        }
        let memberships = self.manager.memberships();
        find_by_organization(&memberships, organization_id)
            .and_then(|membership| builtin_grants(&membership.role))
            .unwrap_or_default()
    }

    // ==================== Scope guards ====================

    /// Capture the current organization scope before issuing a fetch.
    pub fn scope(&self) -> OrgScope {
        self.scopes.capture(self.selector.current_organization_id())
    }

    /// Whether a captured scope still matches the live selection.
    pub fn is_current(&self, scope: &OrgScope) -> bool {
        self.scopes.is_current(scope)
    }

    /// Keep a fetch result only if its scope is still current.
    ///
    /// Returns `None` for results that raced a selection change or
    /// sign-out; the caller drops them instead of rendering.
    pub fn accept<T>(&self, scope: &OrgScope, value: T) -> Option<T> {
        self.scopes.is_current(scope).then_some(value)
    }

    // ==================== Internal ====================

    /// Selection strictly after the membership commit, then events.
    fn handle_signed_in(&self) {
        let current = self.selector.reconcile();
        self.scopes.advance();
        self.events.emit(SessionEvent::SignedIn);
        self.events.emit(SessionEvent::OrganizationChanged {
            organization_id: current.map(|membership| membership.organization_id),
        });
    }

    /// Automatic sign-out: the in-memory selection goes away but the
    /// persisted organization choice survives for the next sign-in.
    fn handle_auto_sign_out(&self) {
        self.selector.reconcile();
        self.scopes.advance();
        self.events.emit(SessionEvent::SignedOut);
    }
}
