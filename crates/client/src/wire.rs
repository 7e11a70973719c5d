use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mes_domain::{PermissionId, PermissionModule, PermissionStatus, RoleId, RoleStatus};

use crate::resource::QueryFilter;

/// Role as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    /// Stable identifier.
    pub role_id: RoleId,
    /// Immutable code.
    pub role_code: String,
    /// Display name.
    pub role_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: RoleStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Permission as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionView {
    /// Stable identifier.
    pub permission_id: PermissionId,
    /// Immutable code.
    pub permission_code: String,
    /// Display name.
    pub permission_name: String,
    /// Owning module.
    pub module: PermissionModule,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: PermissionStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Subject role assignment as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentView {
    /// Subject holding the role.
    pub subject: String,
    /// Assigned role.
    pub role_id: RoleId,
    /// Assigned role code.
    pub role_code: String,
    /// Assigned role name.
    pub role_name: String,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
}

/// Audit log row as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntryView {
    /// Event identifier.
    pub event_id: String,
    /// Acting subject.
    pub subject: String,
    /// Stable action name.
    pub action: String,
    /// Resource type label.
    pub resource_type: String,
    /// Resource identifier.
    pub resource_id: String,
    /// Optional detail text.
    pub detail: Option<String>,
    /// Event timestamp.
    pub created_at: DateTime<Utc>,
}

/// Authenticated operator as returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityView {
    /// Subject identifier.
    pub subject: String,
    /// Display name.
    pub display_name: String,
    /// Tenant identifier.
    pub tenant_id: String,
    /// Effective permission codes.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Role create form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleForm {
    /// Requested code.
    pub role_code: String,
    /// Display name.
    pub role_name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Role edit form. The code cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    /// Display name.
    pub role_name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Permission create form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionForm {
    /// Requested code.
    pub permission_code: String,
    /// Display name.
    pub permission_name: String,
    /// Owning module.
    pub module: PermissionModule,
    /// Optional description.
    pub description: Option<String>,
}

/// Permission edit form. The code cannot be changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionUpdate {
    /// Display name.
    pub permission_name: String,
    /// Owning module.
    pub module: PermissionModule,
    /// Optional description.
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoleAssignmentRequest<'a> {
    pub(crate) subject: &'a str,
    pub(crate) role_id: RoleId,
}

#[derive(Debug, Serialize)]
pub(crate) struct BootstrapRequest<'a> {
    pub(crate) subject: &'a str,
    pub(crate) token: &'a str,
}

/// Zero-based page selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// Zero-based page index.
    pub page: usize,
    /// Page size; the server default applies when absent.
    pub size: Option<usize>,
}

impl PageQuery {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string())];
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        pairs
    }
}

/// Role list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter {
    /// Only roles in this status.
    pub status: Option<RoleStatus>,
    /// Case-insensitive match against code or name.
    pub search: Option<String>,
}

impl QueryFilter for RoleFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        push_search(&mut pairs, self.search.as_deref());
        pairs
    }
}

/// Permission list filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionFilter {
    /// Only permissions in this status.
    pub status: Option<PermissionStatus>,
    /// Only permissions in this module.
    pub module: Option<PermissionModule>,
    /// Case-insensitive match against code or name.
    pub search: Option<String>,
}

impl QueryFilter for PermissionFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_owned()));
        }
        if let Some(module) = self.module {
            pairs.push(("module", module.as_str().to_owned()));
        }
        push_search(&mut pairs, self.search.as_deref());
        pairs
    }
}

/// Audit log filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogFilter {
    /// Maximum rows.
    pub limit: Option<usize>,
    /// Rows to skip.
    pub offset: Option<usize>,
    /// Exact action name.
    pub action: Option<String>,
    /// Exact acting subject.
    pub subject: Option<String>,
}

impl QueryFilter for AuditLogFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(action) = self.action.as_deref() {
            pairs.push(("action", action.to_owned()));
        }
        if let Some(subject) = self.subject.as_deref() {
            pairs.push(("subject", subject.to_owned()));
        }
        pairs
    }
}

fn push_search(pairs: &mut Vec<(&'static str, String)>, search: Option<&str>) {
    if let Some(search) = search.map(str::trim).filter(|value| !value.is_empty()) {
        pairs.push(("search", search.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use mes_domain::{PermissionModule, RoleStatus};

    use super::{PageQuery, PermissionFilter, RoleFilter, RoleView};
    use crate::resource::QueryFilter;

    #[test]
    fn blank_search_is_not_sent() {
        let filter = RoleFilter {
            status: Some(RoleStatus::Inactive),
            search: Some("  ".to_owned()),
        };

        assert_eq!(
            filter.query_pairs(),
            vec![("status", "INACTIVE".to_owned())]
        );
    }

    #[test]
    fn permission_filter_uses_wire_values() {
        let filter = PermissionFilter {
            module: Some(PermissionModule::Quality),
            search: Some("inspect".to_owned()),
            ..PermissionFilter::default()
        };

        assert_eq!(
            filter.query_pairs(),
            vec![
                ("module", "QUALITY".to_owned()),
                ("search", "inspect".to_owned())
            ]
        );
    }

    #[test]
    fn page_query_omits_missing_size() {
        let query = PageQuery { page: 2, size: None };
        assert_eq!(query.query_pairs(), vec![("page", "2".to_owned())]);
    }

    #[test]
    fn role_view_reads_camel_case() {
        let body = r#"{
            "roleId": "6f1b1a53-1d7c-4a53-9f43-8f4c3b0f2f11",
            "roleCode": "QA_LEAD",
            "roleName": "QA Lead",
            "description": null,
            "status": "ACTIVE",
            "createdAt": "2026-01-05T08:00:00Z"
        }"#;

        let role = serde_json::from_str::<RoleView>(body);
        assert!(matches!(role, Ok(role) if role.role_code == "QA_LEAD" && role.status == RoleStatus::Active));
    }
}
