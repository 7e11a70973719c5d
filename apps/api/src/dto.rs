mod common;
mod security;

pub use common::{HealthResponse, ListResponse, UserIdentityResponse};
pub use security::{
    AssignRoleRequest, AuditLogEntryResponse, BootstrapRequest, CreatePermissionRequest,
    CreateRoleRequest, PermissionResponse, RoleAssignmentResponse, RoleResponse,
    UpdatePermissionRequest, UpdateRoleRequest,
};
