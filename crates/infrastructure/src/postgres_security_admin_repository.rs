use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use mes_application::{
    PermissionListQuery, RoleAssignment, RoleListQuery, SecurityAdminRepository,
};
use mes_core::{AppError, AppResult, NonEmptyString, TenantId};
use mes_domain::{
    MembershipChange, Permission, PermissionCode, PermissionId, PermissionModule,
    PermissionStatus, Role, RoleCode, RoleId, RoleStatus,
};

mod grants;
mod permissions;
mod roles;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for roles, permissions and their associations.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    role_code: String,
    role_name: String,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self) -> AppResult<Role> {
        let role_code = RoleCode::new(self.role_code.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "invalid stored role code '{}': {error}",
                self.role_code
            ))
        })?;
        let role_name = NonEmptyString::new(self.role_name).map_err(|error| {
            AppError::Internal(format!("invalid stored role name for '{role_code}': {error}"))
        })?;
        let status = RoleStatus::from_str(self.status.as_str()).map_err(|error| {
            AppError::Internal(format!("invalid stored role status for '{role_code}': {error}"))
        })?;

        Ok(Role::restore(
            RoleId::from_uuid(self.id),
            role_code,
            role_name,
            self.description,
            status,
            self.created_at,
        ))
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: Uuid,
    permission_code: String,
    permission_name: String,
    module: String,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl PermissionRow {
    fn into_permission(self) -> AppResult<Permission> {
        let permission_code =
            PermissionCode::new(self.permission_code.as_str()).map_err(|error| {
                AppError::Internal(format!(
                    "invalid stored permission code '{}': {error}",
                    self.permission_code
                ))
            })?;
        let permission_name = NonEmptyString::new(self.permission_name).map_err(|error| {
            AppError::Internal(format!(
                "invalid stored permission name for '{permission_code}': {error}"
            ))
        })?;
        let module = PermissionModule::from_str(self.module.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "invalid stored module for '{permission_code}': {error}"
            ))
        })?;
        let status = PermissionStatus::from_str(self.status.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "invalid stored permission status for '{permission_code}': {error}"
            ))
        })?;

        Ok(Permission::restore(
            PermissionId::from_uuid(self.id),
            permission_code,
            permission_name,
            module,
            self.description,
            status,
            self.created_at,
        ))
    }
}

#[derive(Debug, FromRow)]
struct RoleAssignmentRow {
    subject: String,
    role_id: Uuid,
    role_code: String,
    role_name: String,
    assigned_at: DateTime<Utc>,
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn list_roles(&self, tenant_id: TenantId, query: &RoleListQuery) -> AppResult<Vec<Role>> {
        self.list_roles_impl(tenant_id, query).await
    }

    async fn find_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<Option<Role>> {
        self.find_role_impl(tenant_id, role_id).await
    }

    async fn find_role_by_code(
        &self,
        tenant_id: TenantId,
        role_code: &RoleCode,
    ) -> AppResult<Option<Role>> {
        self.find_role_by_code_impl(tenant_id, role_code).await
    }

    async fn insert_role(&self, tenant_id: TenantId, role: &Role) -> AppResult<()> {
        self.insert_role_impl(tenant_id, role).await
    }

    async fn save_role(&self, tenant_id: TenantId, role: &Role) -> AppResult<()> {
        self.save_role_impl(tenant_id, role).await
    }

    async fn delete_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(tenant_id, role_id).await
    }

    async fn list_permissions(
        &self,
        tenant_id: TenantId,
        query: &PermissionListQuery,
    ) -> AppResult<Vec<Permission>> {
        self.list_permissions_impl(tenant_id, query).await
    }

    async fn find_permission(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        self.find_permission_impl(tenant_id, permission_id).await
    }

    async fn find_permission_by_code(
        &self,
        tenant_id: TenantId,
        permission_code: &PermissionCode,
    ) -> AppResult<Option<Permission>> {
        self.find_permission_by_code_impl(tenant_id, permission_code)
            .await
    }

    async fn insert_permission(&self, tenant_id: TenantId, permission: &Permission) -> AppResult<()> {
        self.insert_permission_impl(tenant_id, permission).await
    }

    async fn save_permission(&self, tenant_id: TenantId, permission: &Permission) -> AppResult<()> {
        self.save_permission_impl(tenant_id, permission).await
    }

    async fn delete_permission(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.delete_permission_impl(tenant_id, permission_id).await
    }

    async fn list_role_permissions(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>> {
        self.list_role_permissions_impl(tenant_id, role_id).await
    }

    async fn grant_permission(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        self.grant_permission_impl(tenant_id, role_id, permission_id)
            .await
    }

    async fn revoke_permission(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        self.revoke_permission_impl(tenant_id, role_id, permission_id)
            .await
    }

    async fn list_role_assignments(&self, tenant_id: TenantId) -> AppResult<Vec<RoleAssignment>> {
        self.list_role_assignments_impl(tenant_id).await
    }

    async fn assign_role_to_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        self.assign_role_to_subject_impl(tenant_id, subject, role_id)
            .await
    }

    async fn remove_role_from_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        self.remove_role_from_subject_impl(tenant_id, subject, role_id)
            .await
    }
}

fn is_database_error(error: &sqlx::Error, code: &str) -> bool {
    matches!(error, sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some(code))
}

fn map_unique_conflict(error: sqlx::Error, conflict: String, action: &str) -> AppError {
    if is_database_error(&error, "23505") {
        return AppError::Conflict(conflict);
    }

    AppError::Internal(format!("failed to {action}: {error}"))
}

fn map_reference_conflict(error: sqlx::Error, conflict: String, action: &str) -> AppError {
    if is_database_error(&error, "23503") {
        return AppError::Conflict(conflict);
    }

    AppError::Internal(format!("failed to {action}: {error}"))
}

fn map_missing_reference(error: sqlx::Error, missing: String, action: &str) -> AppError {
    if is_database_error(&error, "23503") {
        return AppError::NotFound(missing);
    }

    AppError::Internal(format!("failed to {action}: {error}"))
}

fn search_needle(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}
