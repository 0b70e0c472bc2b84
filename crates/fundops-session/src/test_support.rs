//! Shared test doubles for the session unit tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fundops_api::{ApiError, ApiResult, FundOpsApi};
use fundops_org::{Identity, Membership};
use tokio::sync::Notify;

/// Build a membership for test fixtures.
pub(crate) fn membership(
    organization_id: &str,
    organization_name: &str,
    role: &str,
    primary: bool,
) -> Membership {
    let membership = Membership::new(organization_id, organization_name, role);
    if primary {
        membership.with_primary()
    } else {
        membership
    }
}

/// Rendezvous for parking an identity fetch mid-flight.
pub(crate) struct IdentityGate {
    /// Signalled when the fetch reaches the gate.
    pub entered: Notify,
    /// Signalled by the test to let the fetch continue.
    pub release: Notify,
}

/// Scriptable in-process API double.
pub(crate) struct MockApi {
    token: String,
    identity: Mutex<Identity>,
    memberships: Mutex<Vec<Membership>>,
    fail_authenticate: AtomicBool,
    fail_identity: AtomicBool,
    fail_memberships: AtomicBool,
    fail_change_password: AtomicBool,
    password_changes: AtomicU32,
    gate: Mutex<Option<Arc<IdentityGate>>>,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self {
            token: "tok-test".to_string(),
            identity: Mutex::new(Identity::new("u-1", "jdoe", "jdoe@meridian.example")),
            memberships: Mutex::new(Vec::new()),
            fail_authenticate: AtomicBool::new(false),
            fail_identity: AtomicBool::new(false),
            fail_memberships: AtomicBool::new(false),
            fail_change_password: AtomicBool::new(false),
            password_changes: AtomicU32::new(0),
            gate: Mutex::new(None),
        }
    }

    pub(crate) fn with_memberships(self, memberships: Vec<Membership>) -> Self {
        *self.memberships.lock().unwrap() = memberships;
        self
    }

    pub(crate) fn with_identity(self, identity: Identity) -> Self {
        *self.identity.lock().unwrap() = identity;
        self
    }

    pub(crate) fn set_memberships(&self, memberships: Vec<Membership>) {
        *self.memberships.lock().unwrap() = memberships;
    }

    pub(crate) fn fail_authenticate(&self) {
        self.fail_authenticate.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_identity(&self) {
        self.fail_identity.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_memberships(&self) {
        self.fail_memberships.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_change_password(&self) {
        self.fail_change_password.store(true, Ordering::SeqCst);
    }

    pub(crate) fn password_changes(&self) -> u32 {
        self.password_changes.load(Ordering::SeqCst)
    }

    /// Park the next identity fetch until the returned gate is released.
    pub(crate) fn gate_identity(&self) -> Arc<IdentityGate> {
        let gate = Arc::new(IdentityGate {
            entered: Notify::new(),
            release: Notify::new(),
        });
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl FundOpsApi for MockApi {
    async fn authenticate(&self, _username: &str, _password: &str) -> ApiResult<String> {
        if self.fail_authenticate.load(Ordering::SeqCst) {
            return Err(ApiError::InvalidCredentials);
        }
        Ok(self.token.clone())
    }

    async fn current_identity(&self, _token: &str) -> ApiResult<Identity> {
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if self.fail_identity.load(Ordering::SeqCst) {
            return Err(ApiError::Unauthorized);
        }
        Ok(self.identity.lock().unwrap().clone())
    }

    async fn memberships_for(&self, _token: &str, _user_id: &str) -> ApiResult<Vec<Membership>> {
        if self.fail_memberships.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 500,
                message: "memberships unavailable".to_string(),
            });
        }
        Ok(self.memberships.lock().unwrap().clone())
    }

    async fn change_password(&self, _token: &str, _current: &str, _new: &str) -> ApiResult<()> {
        if self.fail_change_password.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 400,
                message: "Incorrect current password".to_string(),
            });
        }
        self.password_changes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
