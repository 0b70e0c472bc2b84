//! Default organization selection
//!
//! The rule that decides which organization a freshly loaded membership
//! list lands on. Kept as a pure function so the precedence order is
//! testable without a session.

use crate::membership::Membership;

/// Pick the organization a membership list should start on.
///
/// Precedence:
/// 1. The persisted organization id, if it still names an entry of the
///    list. A persisted id pointing at an organization the user has
///    since left is ignored, not an error.
/// 2. The first membership flagged primary, in list order. Lists with
///    several primaries are tolerated; the first wins.
/// 3. The first membership in list order.
///
/// An empty list selects nothing. The function is deterministic and
/// idempotent: feeding the winner's id back as `persisted` returns the
/// same winner.
///
/// # Arguments
///
/// * `memberships` - Membership list in server order
/// * `persisted` - Last organization id the user chose, if any
///
/// # Returns
///
/// The selected membership, or `None` when the list is empty.
///
/// # Examples
///
/// ```
/// use fundops_org::{select_default, Membership};
///
/// let list = vec![
///     Membership::new("org-a", "Alpha", "viewer"),
///     Membership::new("org-b", "Bravo", "admin").with_primary(),
/// ];
///
/// // No persisted choice: the primary wins.
/// let picked = select_default(&list, None).unwrap();
/// assert_eq!(picked.organization_id, "org-b");
///
/// // A persisted choice overrides the primary.
/// let picked = select_default(&list, Some("org-a")).unwrap();
/// assert_eq!(picked.organization_id, "org-a");
/// ```
pub fn select_default<'a>(
    memberships: &'a [Membership],
    persisted: Option<&str>,
) -> Option<&'a Membership> {
    if let Some(id) = persisted {
        if let Some(found) = find_by_organization(memberships, id) {
            return Some(found);
        }
    }

    memberships
        .iter()
        .find(|m| m.is_primary)
        .or_else(|| memberships.first())
}

/// Find the membership for an organization id.
///
/// # Arguments
///
/// * `memberships` - Membership list to search
/// * `organization_id` - Exact organization id
pub fn find_by_organization<'a>(
    memberships: &'a [Membership],
    organization_id: &str,
) -> Option<&'a Membership> {
    memberships
        .iter()
        .find(|m| m.organization_id == organization_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_orgs() -> Vec<Membership> {
        vec![
            Membership::new("org-a", "Alpha", "viewer"),
            Membership::new("org-b", "Bravo", "admin").with_primary(),
            Membership::new("org-c", "Charlie", "analyst"),
        ]
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        assert!(select_default(&[], None).is_none());
        assert!(select_default(&[], Some("org-a")).is_none());
    }

    #[test]
    fn test_primary_wins_without_persisted_choice() {
        let list = three_orgs();
        let picked = select_default(&list, None).unwrap();
        assert_eq!(picked.organization_id, "org-b");
    }

    #[test]
    fn test_persisted_choice_overrides_primary() {
        let list = three_orgs();
        let picked = select_default(&list, Some("org-c")).unwrap();
        assert_eq!(picked.organization_id, "org-c");
    }

    #[test]
    fn test_dangling_persisted_id_falls_back_to_primary() {
        let list = three_orgs();
        let picked = select_default(&list, Some("org-z")).unwrap();
        assert_eq!(picked.organization_id, "org-b");
    }

    #[test]
    fn test_no_primary_falls_back_to_first() {
        let list = vec![
            Membership::new("org-a", "Alpha", "viewer"),
            Membership::new("org-c", "Charlie", "analyst"),
        ];
        let picked = select_default(&list, None).unwrap();
        assert_eq!(picked.organization_id, "org-a");
    }

    #[test]
    fn test_first_of_several_primaries_wins() {
        let list = vec![
            Membership::new("org-a", "Alpha", "viewer").with_primary(),
            Membership::new("org-b", "Bravo", "admin").with_primary(),
        ];
        let picked = select_default(&list, None).unwrap();
        assert_eq!(picked.organization_id, "org-a");
    }

    #[test]
    fn test_selection_is_idempotent() {
        let list = three_orgs();

        let first = select_default(&list, Some("org-c")).unwrap();
        let second = select_default(&list, Some(&first.organization_id)).unwrap();
        assert_eq!(first, second);

        let first = select_default(&list, None).unwrap();
        let second = select_default(&list, Some(&first.organization_id)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_by_organization() {
        let list = three_orgs();
        assert!(find_by_organization(&list, "org-b").is_some());
        assert!(find_by_organization(&list, "org-z").is_none());
        // Exact match only; ids are opaque and case matters.
        assert!(find_by_organization(&list, "ORG-B").is_none());
    }
}
