use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub role_code: String,
    pub role_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming payload for role edits. The code is not updatable.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub role_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: String,
    pub role_code: String,
    pub role_name: String,
    pub description: Option<String>,
    /// `ACTIVE` or `INACTIVE`.
    pub status: String,
    pub created_at: String,
}

/// Incoming payload for permission creation.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-request.ts"
)]
pub struct CreatePermissionRequest {
    pub permission_code: String,
    pub permission_name: String,
    /// Module code such as `PRODUCTION` or `QUALITY`.
    pub module: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming payload for permission edits. The code is not updatable.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-permission-request.ts"
)]
pub struct UpdatePermissionRequest {
    pub permission_name: String,
    pub module: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// API representation of a permission.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub permission_id: String,
    pub permission_code: String,
    pub permission_name: String,
    pub module: String,
    pub description: Option<String>,
    /// `active` or `inactive`.
    pub status: String,
    pub created_at: String,
}

/// Incoming payload for subject role assignment.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/assign-role-request.ts"
)]
pub struct AssignRoleRequest {
    pub subject: String,
    pub role_id: String,
}

/// API representation of a subject role assignment.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-assignment-response.ts"
)]
pub struct RoleAssignmentResponse {
    pub subject: String,
    pub role_id: String,
    pub role_code: String,
    pub role_name: String,
    pub assigned_at: String,
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

/// Incoming payload for bootstrap sign-in.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub subject: String,
    pub token: String,
}
