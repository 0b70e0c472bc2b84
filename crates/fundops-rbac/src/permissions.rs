//! # Permission Sets
//!
//! Collections of granted capabilities.
//!
//! A [`PermissionSet`] is the client-side view of the permission map the
//! API carries on role records. On the wire it is a flat JSON object of
//! boolean flags:
//!
//! ```json
//! {
//!   "can_manage_users": true,
//!   "can_manage_funds": true,
//!   "can_view_all_data": true,
//!   "can_approve_transactions": false
//! }
//! ```
//!
//! Missing keys deserialize as "not granted"; unknown keys are ignored so
//! newer servers can add flags without breaking older clients.

use std::collections::{HashMap, HashSet};

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::capability::Capability;

/// A set of granted capabilities.
///
/// # Example
///
/// ```
/// use fundops_rbac::{Capability, PermissionSet};
///
/// let mut set = PermissionSet::new();
/// set.add(Capability::ManageFunds);
/// set.add(Capability::ViewFinancials);
///
/// assert!(set.grants(Capability::ManageFunds));
/// assert!(!set.grants(Capability::ApproveTransactions));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    granted: HashSet<Capability>,
}

impl PermissionSet {
    /// Create an empty permission set.
    pub fn new() -> Self {
        Self {
            granted: HashSet::new(),
        }
    }

    /// Create a set granting every capability.
    ///
    /// Used for superusers, who bypass per-role grants entirely.
    pub fn full() -> Self {
        Self {
            granted: Capability::all().into_iter().collect(),
        }
    }

    /// Grant a capability.
    pub fn add(&mut self, capability: Capability) {
        self.granted.insert(capability);
    }

    /// Grant several capabilities at once.
    ///
    /// # Arguments
    ///
    /// * `capabilities` - Capabilities to grant
    pub fn add_all(&mut self, capabilities: impl IntoIterator<Item = Capability>) {
        self.granted.extend(capabilities);
    }

    /// Revoke a capability.
    ///
    /// # Returns
    ///
    /// `true` if the capability was previously granted
    pub fn remove(&mut self, capability: Capability) -> bool {
        self.granted.remove(&capability)
    }

    /// Check whether a capability is granted.
    pub fn grants(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }

    /// Check whether every listed capability is granted.
    ///
    /// # Arguments
    ///
    /// * `capabilities` - Capabilities that must all be present
    pub fn grants_all(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().all(|c| self.granted.contains(c))
    }

    /// Check whether at least one listed capability is granted.
    ///
    /// # Arguments
    ///
    /// * `capabilities` - Capabilities of which one suffices
    pub fn grants_any(&self, capabilities: &[Capability]) -> bool {
        capabilities.iter().any(|c| self.granted.contains(c))
    }

    /// Merge another set into this one.
    ///
    /// The result grants the union of both sets.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.granted.extend(other.granted.iter().copied());
    }

    /// All granted capabilities, in wire order.
    pub fn all(&self) -> Vec<Capability> {
        Capability::all()
            .into_iter()
            .filter(|c| self.granted.contains(c))
            .collect()
    }

    /// Number of granted capabilities.
    pub fn len(&self) -> usize {
        self.granted.len()
    }

    /// Whether nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Revoke everything.
    pub fn clear(&mut self) {
        self.granted.clear();
    }
}

impl FromIterator<Capability> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            granted: iter.into_iter().collect(),
        }
    }
}

impl Serialize for PermissionSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Emit every flag explicitly, granted or not, as the API does.
        let all = Capability::all();
        let mut map = serializer.serialize_map(Some(all.len()))?;
        for capability in all {
            map.serialize_entry(capability.as_str(), &self.granted.contains(&capability))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let flags = HashMap::<String, bool>::deserialize(deserializer)?;
        let mut set = PermissionSet::new();
        for (key, granted) in flags {
            if granted {
                if let Some(capability) = Capability::parse(&key) {
                    set.add(capability);
                }
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_and_check() {
        let mut set = PermissionSet::new();
        assert!(set.is_empty());

        set.add(Capability::ManageFunds);
        set.add(Capability::ViewFinancials);

        assert!(set.grants(Capability::ManageFunds));
        assert!(set.grants(Capability::ViewFinancials));
        assert!(!set.grants(Capability::ManageUsers));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut set = PermissionSet::new();
        set.add(Capability::ManageFunds);
        set.add(Capability::ManageFunds);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut set = PermissionSet::new();
        set.add(Capability::ManageFunds);

        assert!(set.remove(Capability::ManageFunds));
        assert!(!set.remove(Capability::ManageFunds));
        assert!(!set.grants(Capability::ManageFunds));
    }

    #[test]
    fn test_grants_all_and_any() {
        let set: PermissionSet = [Capability::ViewAllData, Capability::ViewFinancials]
            .into_iter()
            .collect();

        assert!(set.grants_all(&[Capability::ViewAllData, Capability::ViewFinancials]));
        assert!(!set.grants_all(&[Capability::ViewAllData, Capability::ManageFunds]));

        assert!(set.grants_any(&[Capability::ManageFunds, Capability::ViewFinancials]));
        assert!(!set.grants_any(&[Capability::ManageFunds, Capability::ManageUsers]));

        assert!(set.grants_all(&[]));
        assert!(!set.grants_any(&[]));
    }

    #[test]
    fn test_merge() {
        let mut a: PermissionSet = [Capability::ManageFunds].into_iter().collect();
        let b: PermissionSet = [Capability::ManageFunds, Capability::ManageInvestors]
            .into_iter()
            .collect();

        a.merge(&b);
        assert_eq!(a.len(), 2);
        assert!(a.grants(Capability::ManageInvestors));
    }

    #[test]
    fn test_full_grants_everything() {
        let set = PermissionSet::full();
        for capability in Capability::all() {
            assert!(set.grants(capability));
        }
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn test_all_returns_wire_order() {
        let set: PermissionSet = [Capability::ViewFinancials, Capability::ManageUsers]
            .into_iter()
            .collect();
        assert_eq!(
            set.all(),
            vec![Capability::ManageUsers, Capability::ViewFinancials]
        );
    }

    #[test]
    fn test_clear() {
        let mut set = PermissionSet::full();
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_serialize_emits_every_flag() {
        let set: PermissionSet = [Capability::ManageFunds].into_iter().collect();
        let value = serde_json::to_value(&set).unwrap();

        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 8);
        assert_eq!(map["can_manage_funds"], true);
        assert_eq!(map["can_manage_users"], false);
        assert_eq!(map["can_view_financials"], false);
    }

    #[test]
    fn test_deserialize_tolerates_missing_keys() {
        // Seeded role records omit can_manage_organizations entirely.
        let set: PermissionSet = serde_json::from_str(
            r#"{
                "can_manage_users": true,
                "can_manage_funds": true,
                "can_view_all_data": true,
                "can_view_financials": false
            }"#,
        )
        .unwrap();

        assert!(set.grants(Capability::ManageUsers));
        assert!(set.grants(Capability::ManageFunds));
        assert!(set.grants(Capability::ViewAllData));
        assert!(!set.grants(Capability::ViewFinancials));
        assert!(!set.grants(Capability::ManageOrganizations));
    }

    #[test]
    fn test_deserialize_ignores_unknown_keys() {
        let set: PermissionSet = serde_json::from_str(
            r#"{"can_manage_funds": true, "can_fly_helicopters": true}"#,
        )
        .unwrap();

        assert_eq!(set.len(), 1);
        assert!(set.grants(Capability::ManageFunds));
    }

    #[test]
    fn test_serde_round_trip() {
        let original: PermissionSet = [
            Capability::ManageInvestors,
            Capability::ViewAllData,
            Capability::ApproveTransactions,
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&original).unwrap();
        let parsed: PermissionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(original, parsed);
    }
}
