//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod authorization_service;
mod security_admin_ports;
mod security_admin_service;

pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use security_admin_ports::{
    PermissionListQuery, RoleAssignment, RoleListQuery, SecurityAdminRepository,
    UpdatePermissionInput, UpdateRoleInput,
};
pub use security_admin_service::SecurityAdminService;
