use chrono::{DateTime, Utc};
use mes_domain::{Role, RoleCode, RoleId, RoleStatus};

/// Filters for role listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleListQuery {
    /// Optional status filter.
    pub status: Option<RoleStatus>,
    /// Optional case-insensitive match against code or name.
    pub search: Option<String>,
}

impl RoleListQuery {
    /// Returns whether a role passes the filters.
    #[must_use]
    pub fn matches(&self, role: &Role) -> bool {
        if self.status.is_some_and(|status| status != role.status()) {
            return false;
        }

        let Some(search) = self.search.as_deref().map(str::trim) else {
            return true;
        };
        if search.is_empty() {
            return true;
        }

        let needle = search.to_lowercase();
        role.role_code().as_str().to_lowercase().contains(&needle)
            || role.role_name().as_str().to_lowercase().contains(&needle)
    }
}

/// Mutable role fields. The role code is intentionally absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New display name.
    pub role_name: String,
    /// New description; blank clears it.
    pub description: Option<String>,
}

/// Assignment projection mapping a subject to a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Subject identifier.
    pub subject: String,
    /// Role identifier.
    pub role_id: RoleId,
    /// Role code.
    pub role_code: RoleCode,
    /// Role name.
    pub role_name: String,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}
