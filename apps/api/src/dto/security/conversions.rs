use mes_application::{AuditLogEntry, RoleAssignment};
use mes_domain::{Permission, Role};

use super::types::{AuditLogEntryResponse, PermissionResponse, RoleAssignmentResponse, RoleResponse};

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.role_id().to_string(),
            role_code: value.role_code().as_str().to_owned(),
            role_name: value.role_name().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            status: value.status().as_str().to_owned(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            permission_id: value.permission_id().to_string(),
            permission_code: value.permission_code().as_str().to_owned(),
            permission_name: value.permission_name().as_str().to_owned(),
            module: value.module().as_str().to_owned(),
            description: value.description().map(ToOwned::to_owned),
            status: value.status().as_str().to_owned(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

impl From<RoleAssignment> for RoleAssignmentResponse {
    fn from(value: RoleAssignment) -> Self {
        Self {
            subject: value.subject,
            role_id: value.role_id.to_string(),
            role_code: value.role_code.as_str().to_owned(),
            role_name: value.role_name,
            assigned_at: value.assigned_at.to_rfc3339(),
        }
    }
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            event_id: value.event_id,
            subject: value.subject,
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
