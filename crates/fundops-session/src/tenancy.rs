//! Organization selection over the session's membership list.
//!
//! [`TenancySelector`] derives the organization list from the session
//! manager, remembers the last choice across restarts, and exposes the
//! single current organization everything else scopes to. It is the
//! only writer of the persisted organization key.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fundops_org::{find_by_organization, select_default, Membership};
use tracing::{debug, instrument, warn};

use crate::error::{SessionError, SessionResult};
use crate::manager::SessionManager;
use crate::store::{SessionStore, SELECTED_ORG_KEY};

/// Tracks which of the user's organizations is selected.
///
/// Selection is always drawn from the manager's current membership
/// list; there is no way to select an organization the user is not a
/// member of. Reconciliation is deterministic and idempotent: persisted
/// choice if still valid, else the first primary membership, else the
/// first membership, else nothing.
pub struct TenancySelector {
    manager: Arc<SessionManager>,
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Membership>>,
}

impl TenancySelector {
    /// Create a selector over a session manager and the shared store.
    pub fn new(manager: Arc<SessionManager>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            manager,
            store,
            current: RwLock::new(None),
        }
    }

    /// The organizations available for selection, shared with the
    /// session manager. Order is the API's order; nothing re-sorts it.
    pub fn list(&self) -> Arc<[Membership]> {
        self.manager.memberships()
    }

    /// The selected membership, `None` when nothing is selected.
    pub fn current(&self) -> Option<Membership> {
        self.read_current().clone()
    }

    /// The selected organization id, `None` when nothing is selected.
    pub fn current_organization_id(&self) -> Option<String> {
        self.read_current()
            .as_ref()
            .map(|m| m.organization_id.clone())
    }

    /// Select an organization by id.
    ///
    /// The id must name an entry of the current membership list. On
    /// success the choice is persisted for the next session.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidSelection`] when the id is not in the
    /// list; nothing changes in that case.
    #[instrument(skip(self), fields(organization_id = %organization_id))]
    pub fn select(&self, organization_id: &str) -> SessionResult<Membership> {
        let memberships = self.manager.memberships();
        let Some(found) = find_by_organization(&memberships, organization_id) else {
            debug!("Rejecting selection outside the membership list");
            return Err(SessionError::InvalidSelection {
                organization_id: organization_id.to_string(),
            });
        };

        let selected = found.clone();
        *self.write_current() = Some(selected.clone());
        self.persist(&selected.organization_id);
        Ok(selected)
    }

    /// Re-derive the selection from the current membership list.
    ///
    /// Run after every committed membership change and on sign-out.
    /// An empty list clears the in-memory selection but leaves the
    /// persisted id alone, so the choice survives a re-login.
    ///
    /// # Returns
    ///
    /// The new current membership, if any.
    #[instrument(skip(self))]
    pub fn reconcile(&self) -> Option<Membership> {
        let memberships = self.manager.memberships();
        let persisted = self.store.get(SELECTED_ORG_KEY);
        let winner = select_default(&memberships, persisted.as_deref()).cloned();

        if let Some(membership) = &winner {
            if persisted.as_deref() != Some(membership.organization_id.as_str()) {
                self.persist(&membership.organization_id);
            }
        }

        *self.write_current() = winner.clone();
        winner
    }

    /// Forget the selection, in memory and persisted.
    ///
    /// Explicit sign-out only; automatic sign-out goes through
    /// [`reconcile`](Self::reconcile) with an empty list instead, which
    /// keeps the persisted choice.
    pub fn clear(&self) {
        *self.write_current() = None;
        if let Err(error) = self.store.remove(SELECTED_ORG_KEY) {
            warn!("Failed to clear persisted organization: {}", error);
        }
    }

    fn persist(&self, organization_id: &str) {
        if let Err(error) = self.store.set(SELECTED_ORG_KEY, organization_id) {
            warn!("Failed to persist organization selection: {}", error);
        }
    }

    fn read_current(&self) -> RwLockReadGuard<'_, Option<Membership>> {
        match self.current.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_current(&self) -> RwLockWriteGuard<'_, Option<Membership>> {
        match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
