//! Session lifecycle and token custody.
//!
//! [`SessionManager`] owns the access token, the authenticated identity,
//! and the membership list. It is the only writer of the persisted token
//! key. Organization selection lives a level up in the tenancy selector;
//! the manager knows nothing about it.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fundops_api::FundOpsApi;
use fundops_org::{Identity, Membership};
use tracing::{debug, instrument, warn};

use crate::error::SessionResult;
use crate::store::{SessionStore, ACCESS_TOKEN_KEY};

/// What the session currently is.
enum SessionState {
    /// No token, no identity.
    Unauthenticated,

    /// A persisted token exists and hydration has not settled yet.
    Restoring,

    /// Token accepted, identity and memberships loaded.
    Authenticated {
        token: String,
        identity: Identity,
        memberships: Arc<[Membership]>,
    },
}

/// State plus the generation counter that serializes commits.
struct Inner {
    /// Advances on every state-changing operation. An in-flight
    /// hydration commits only if the generation it captured is still
    /// current; superseded hydrations are discarded.
    generation: u64,
    state: SessionState,
}

/// Holds the session state machine: token lifecycle, identity, and
/// membership list.
///
/// All methods take `&self`; the manager is shared behind an [`Arc`].
/// The state lock is never held across an await point. Hydration
/// (identity fetch, then membership fetch) runs outside the lock and
/// commits through a generation check, so a `logout` during a slow
/// hydration wins and the late result is dropped.
pub struct SessionManager {
    api: Arc<dyn FundOpsApi>,
    store: Arc<dyn SessionStore>,
    inner: RwLock<Inner>,
}

impl SessionManager {
    /// Create a manager over an API client and a session store.
    ///
    /// If the store holds a token the manager starts in the restoring
    /// state; call [`restore`](Self::restore) to settle it. Otherwise it
    /// starts unauthenticated.
    pub fn new(api: Arc<dyn FundOpsApi>, store: Arc<dyn SessionStore>) -> Self {
        let state = if store.get(ACCESS_TOKEN_KEY).is_some() {
            SessionState::Restoring
        } else {
            SessionState::Unauthenticated
        };

        Self {
            api,
            store,
            inner: RwLock::new(Inner {
                generation: 0,
                state,
            }),
        }
    }

    /// Rebuild the session from the persisted token.
    ///
    /// Fetches the identity and then the memberships. Any failure
    /// discards the persisted token and leaves the session
    /// unauthenticated; errors are never surfaced, callers observe
    /// state.
    ///
    /// # Returns
    ///
    /// `true` if this call ended with a committed authenticated session.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> bool {
        let Some(token) = self.store.get(ACCESS_TOKEN_KEY) else {
            let mut inner = self.write_inner();
            inner.generation += 1;
            inner.state = SessionState::Unauthenticated;
            return false;
        };

        let generation = {
            let mut inner = self.write_inner();
            inner.generation += 1;
            inner.state = SessionState::Restoring;
            inner.generation
        };

        debug!("Restoring session from persisted token");
        match self.hydrate(&token).await {
            Ok((identity, memberships)) => self.commit(generation, token, identity, memberships),
            Err(error) => {
                warn!("Session restore failed: {}", error);
                self.fail(generation);
                false
            }
        }
    }

    /// Exchange credentials for a session.
    ///
    /// The token is persisted before hydration so a crash mid-hydration
    /// restores on the next start. If hydration fails the token is
    /// discarded again; a persisted token never outlives a failed
    /// hydration. Credential and network failures leave the previous
    /// state untouched.
    ///
    /// If a concurrent `logout` superseded this call its result is
    /// discarded; callers observe the final state.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> SessionResult<()> {
        debug!("Signing in");
        let token = self.api.authenticate(username, password).await?;

        if let Err(error) = self.store.set(ACCESS_TOKEN_KEY, &token) {
            warn!(
                "Failed to persist access token; session will not survive a restart: {}",
                error
            );
        }

        let generation = {
            let mut inner = self.write_inner();
            inner.generation += 1;
            inner.state = SessionState::Restoring;
            inner.generation
        };

        match self.hydrate(&token).await {
            Ok((identity, memberships)) => {
                if !self.commit(generation, token, identity, memberships) {
                    debug!("Sign-in superseded by a concurrent state change");
                }
                Ok(())
            }
            Err(error) => {
                self.fail(generation);
                Err(error)
            }
        }
    }

    /// End the session.
    ///
    /// Synchronous and infallible: clears the state and discards the
    /// persisted token. Any in-flight hydration is superseded and will
    /// not commit.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        debug!("Signing out");
        {
            let mut inner = self.write_inner();
            inner.generation += 1;
            inner.state = SessionState::Unauthenticated;
        }
        if let Err(error) = self.store.remove(ACCESS_TOKEN_KEY) {
            warn!("Failed to clear persisted token: {}", error);
        }
    }

    /// Re-fetch identity and memberships for the current token.
    ///
    /// The session stays authenticated while the refresh is in flight.
    /// Failure is handled as a failed restore: token discarded, session
    /// signed out.
    ///
    /// # Returns
    ///
    /// `true` if the refresh committed.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> bool {
        let (generation, token) = {
            let mut inner = self.write_inner();
            let SessionState::Authenticated { token, .. } = &inner.state else {
                return false;
            };
            let token = token.clone();
            inner.generation += 1;
            (inner.generation, token)
        };

        debug!("Refreshing session");
        match self.hydrate(&token).await {
            Ok((identity, memberships)) => self.commit(generation, token, identity, memberships),
            Err(error) => {
                warn!("Session refresh failed, signing out: {}", error);
                self.fail(generation);
                false
            }
        }
    }

    /// Identity fetch, then membership fetch. The ordering is load
    /// bearing: the membership call needs the user id.
    async fn hydrate(&self, token: &str) -> SessionResult<(Identity, Vec<Membership>)> {
        let identity = self.api.current_identity(token).await?;
        let memberships = self.api.memberships_for(token, &identity.id).await?;
        Ok((identity, memberships))
    }

    /// Commit a hydration result if its generation is still current.
    fn commit(
        &self,
        generation: u64,
        token: String,
        identity: Identity,
        memberships: Vec<Membership>,
    ) -> bool {
        let mut inner = self.write_inner();
        if inner.generation != generation {
            debug!("Discarding superseded hydration result");
            return false;
        }
        inner.state = SessionState::Authenticated {
            token,
            identity,
            memberships: memberships.into(),
        };
        true
    }

    /// Sign out after a failed hydration, if nothing else intervened.
    /// The persisted token is only discarded when the failure is still
    /// current; a concurrent sign-in owns the key by then.
    fn fail(&self, generation: u64) {
        let discard = {
            let mut inner = self.write_inner();
            if inner.generation == generation {
                inner.state = SessionState::Unauthenticated;
                true
            } else {
                false
            }
        };
        if discard {
            if let Err(error) = self.store.remove(ACCESS_TOKEN_KEY) {
                warn!("Failed to discard persisted token: {}", error);
            }
        }
    }

    // ==================== Read accessors ====================

    /// Whether a hydrated session is present.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.read_inner().state, SessionState::Authenticated { .. })
    }

    /// Whether a restore or sign-in hydration is settling.
    pub fn is_restoring(&self) -> bool {
        matches!(self.read_inner().state, SessionState::Restoring)
    }

    /// The authenticated identity, if any.
    pub fn identity(&self) -> Option<Identity> {
        match &self.read_inner().state {
            SessionState::Authenticated { identity, .. } => Some(identity.clone()),
            _ => None,
        }
    }

    /// The membership list, shared. Empty when unauthenticated.
    pub fn memberships(&self) -> Arc<[Membership]> {
        match &self.read_inner().state {
            SessionState::Authenticated { memberships, .. } => memberships.clone(),
            _ => Vec::new().into(),
        }
    }

    /// The current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        match &self.read_inner().state {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            _ => None,
        }
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
