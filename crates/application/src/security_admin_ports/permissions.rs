use mes_domain::{Permission, PermissionModule, PermissionStatus};

/// Filters for permission listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionListQuery {
    /// Optional status filter.
    pub status: Option<PermissionStatus>,
    /// Optional module filter.
    pub module: Option<PermissionModule>,
    /// Optional case-insensitive match against code or name.
    pub search: Option<String>,
}

impl PermissionListQuery {
    /// Returns whether a permission passes the filters.
    #[must_use]
    pub fn matches(&self, permission: &Permission) -> bool {
        if self.status.is_some_and(|status| status != permission.status()) {
            return false;
        }
        if self.module.is_some_and(|module| module != permission.module()) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => {
                let needle = search.to_lowercase();
                permission
                    .permission_code()
                    .as_str()
                    .to_lowercase()
                    .contains(&needle)
                    || permission
                        .permission_name()
                        .as_str()
                        .to_lowercase()
                        .contains(&needle)
            }
            _ => true,
        }
    }
}

/// Mutable permission fields. The permission code is intentionally absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePermissionInput {
    /// New display name.
    pub permission_name: String,
    /// New owning module.
    pub module: PermissionModule,
    /// New description; blank clears it.
    pub description: Option<String>,
}
