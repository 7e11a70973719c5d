use async_trait::async_trait;

use mes_core::{AppResult, TenantId};
use mes_domain::{
    MembershipChange, Permission, PermissionCode, PermissionId, Role, RoleCode, RoleId,
};

use super::permissions::PermissionListQuery;
use super::roles::{RoleAssignment, RoleListQuery};

/// Repository port for roles, the permission catalog and their associations.
///
/// Listings are ordered by code. Membership edits are idempotent and report
/// whether stored state changed.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Lists tenant roles matching the query.
    async fn list_roles(&self, tenant_id: TenantId, query: &RoleListQuery) -> AppResult<Vec<Role>>;

    /// Finds a role by identifier.
    async fn find_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Finds a role by its unique code.
    async fn find_role_by_code(
        &self,
        tenant_id: TenantId,
        role_code: &RoleCode,
    ) -> AppResult<Option<Role>>;

    /// Inserts a new role. Fails with a conflict when the code is taken.
    async fn insert_role(&self, tenant_id: TenantId, role: &Role) -> AppResult<()>;

    /// Persists name, description and status of an existing role.
    async fn save_role(&self, tenant_id: TenantId, role: &Role) -> AppResult<()>;

    /// Deletes a role and its permission grants.
    ///
    /// Fails with a conflict while any subject still holds the role.
    async fn delete_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<()>;

    /// Lists tenant permissions matching the query.
    async fn list_permissions(
        &self,
        tenant_id: TenantId,
        query: &PermissionListQuery,
    ) -> AppResult<Vec<Permission>>;

    /// Finds a permission by identifier.
    async fn find_permission(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>>;

    /// Finds a permission by its unique code.
    async fn find_permission_by_code(
        &self,
        tenant_id: TenantId,
        permission_code: &PermissionCode,
    ) -> AppResult<Option<Permission>>;

    /// Inserts a new permission. Fails with a conflict when the code is taken.
    async fn insert_permission(&self, tenant_id: TenantId, permission: &Permission)
    -> AppResult<()>;

    /// Persists name, module, description and status of an existing permission.
    async fn save_permission(&self, tenant_id: TenantId, permission: &Permission) -> AppResult<()>;

    /// Deletes a permission.
    ///
    /// Fails with a conflict while any role still holds the permission.
    async fn delete_permission(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<()>;

    /// Lists the permissions currently granted to a role.
    async fn list_role_permissions(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>>;

    /// Grants a permission to a role.
    async fn grant_permission(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange>;

    /// Revokes a permission from a role.
    async fn revoke_permission(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange>;

    /// Lists subject role assignments in tenant scope.
    async fn list_role_assignments(&self, tenant_id: TenantId) -> AppResult<Vec<RoleAssignment>>;

    /// Assigns a role to a subject.
    async fn assign_role_to_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange>;

    /// Removes a role from a subject.
    async fn remove_role_from_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange>;
}
