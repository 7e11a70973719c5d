mod conversions;
mod types;

pub use types::{
    AssignRoleRequest, AuditLogEntryResponse, BootstrapRequest, CreatePermissionRequest,
    CreateRoleRequest, PermissionResponse, RoleAssignmentResponse, RoleResponse,
    UpdatePermissionRequest, UpdateRoleRequest,
};
