mod permissions;
mod repositories;
mod roles;

pub use permissions::{PermissionListQuery, UpdatePermissionInput};
pub use repositories::SecurityAdminRepository;
pub use roles::{RoleAssignment, RoleListQuery, UpdateRoleInput};
