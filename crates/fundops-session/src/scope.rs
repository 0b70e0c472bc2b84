//! Stale-result suppression for organization-scoped fetches.
//!
//! A page captures an [`OrgScope`] before issuing a fetch. The epoch
//! inside it advances on every selection change and sign-out, so when
//! the response arrives the page can tell whether the data still
//! belongs to the organization on screen. Results under a stale epoch
//! are dropped, not rendered.

use std::sync::atomic::{AtomicU64, Ordering};

/// The organization a fetch was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgScope {
    /// Selected organization at capture time, `None` when nothing was
    /// selected.
    pub organization_id: Option<String>,

    /// Epoch at capture time.
    pub epoch: u64,
}

/// Epoch counter behind scope capture and validation.
#[derive(Debug, Default)]
pub(crate) struct ScopeTracker {
    epoch: AtomicU64,
}

impl ScopeTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Invalidate every scope captured so far.
    pub(crate) fn advance(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Capture a scope for the given selection.
    pub(crate) fn capture(&self, organization_id: Option<String>) -> OrgScope {
        OrgScope {
            organization_id,
            epoch: self.epoch.load(Ordering::SeqCst),
        }
    }

    /// Whether a captured scope is still the live one.
    pub(crate) fn is_current(&self, scope: &OrgScope) -> bool {
        scope.epoch == self.epoch.load(Ordering::SeqCst)
    }
}
