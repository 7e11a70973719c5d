//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod code;
mod membership;
mod paging;
mod permission;
mod role;
mod security;

pub use code::{CODE_MAX_LENGTH, CODE_MIN_LENGTH, is_upper_snake_case};
pub use membership::{MembershipChange, RolePermissionSet};
pub use paging::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PageRequest};
pub use permission::{
    Permission, PermissionCode, PermissionDraft, PermissionId, PermissionModule,
    PermissionStatus,
};
pub use role::{
    DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH, Role, RoleCode, RoleDraft, RoleId, RoleStatus,
};
pub use security::{AdminCapability, AuditAction, SYSTEM_ADMIN_ROLE_CODE};
