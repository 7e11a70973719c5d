use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::permission::PermissionId;
use crate::role::RoleId;

/// Outcome of a single membership edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    /// The edit changed the stored membership.
    Applied,
    /// The membership was already in the requested state.
    Unchanged,
}

impl MembershipChange {
    /// Maps a storage-level "did anything change" flag to a change outcome.
    #[must_use]
    pub fn from_applied(applied: bool) -> Self {
        if applied {
            Self::Applied
        } else {
            Self::Unchanged
        }
    }

    /// Returns whether the edit changed stored state.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Unordered, duplicate-free set of permissions granted to one role.
///
/// Every grant and revoke goes through this type so repeated edits of the same
/// pair collapse into [`MembershipChange::Unchanged`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissionSet {
    role_id: RoleId,
    permission_ids: BTreeSet<PermissionId>,
}

impl RolePermissionSet {
    /// Creates an empty set for a role.
    #[must_use]
    pub fn empty(role_id: RoleId) -> Self {
        Self {
            role_id,
            permission_ids: BTreeSet::new(),
        }
    }

    /// Creates a set from stored rows, collapsing duplicates.
    #[must_use]
    pub fn from_rows(role_id: RoleId, permission_ids: impl IntoIterator<Item = PermissionId>) -> Self {
        Self {
            role_id,
            permission_ids: permission_ids.into_iter().collect(),
        }
    }

    /// Returns the owning role.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Grants a permission.
    pub fn grant(&mut self, permission_id: PermissionId) -> MembershipChange {
        MembershipChange::from_applied(self.permission_ids.insert(permission_id))
    }

    /// Revokes a permission.
    pub fn revoke(&mut self, permission_id: PermissionId) -> MembershipChange {
        MembershipChange::from_applied(self.permission_ids.remove(&permission_id))
    }

    /// Returns whether the permission is granted.
    #[must_use]
    pub fn contains(&self, permission_id: PermissionId) -> bool {
        self.permission_ids.contains(&permission_id)
    }

    /// Iterates granted permission ids.
    pub fn iter(&self) -> impl Iterator<Item = PermissionId> + '_ {
        self.permission_ids.iter().copied()
    }

    /// Returns the number of granted permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permission_ids.len()
    }

    /// Returns whether nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permission_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{MembershipChange, RolePermissionSet};
    use crate::{PermissionId, RoleId};

    #[test]
    fn grant_twice_keeps_one_entry() {
        let mut set = RolePermissionSet::empty(RoleId::new());
        let permission_id = PermissionId::new();

        assert_eq!(set.grant(permission_id), MembershipChange::Applied);
        assert_eq!(set.grant(permission_id), MembershipChange::Unchanged);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn revoke_absent_permission_is_unchanged() {
        let mut set = RolePermissionSet::empty(RoleId::new());
        let permission_id = PermissionId::new();

        assert_eq!(set.revoke(permission_id), MembershipChange::Unchanged);
        set.grant(permission_id);
        assert_eq!(set.revoke(permission_id), MembershipChange::Applied);
        assert!(set.is_empty());
    }

    #[test]
    fn from_rows_collapses_duplicates() {
        let permission_id = PermissionId::new();
        let set = RolePermissionSet::from_rows(RoleId::new(), [permission_id, permission_id]);

        assert_eq!(set.len(), 1);
        assert!(set.contains(permission_id));
    }
}
