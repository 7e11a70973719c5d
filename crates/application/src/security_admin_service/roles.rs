use mes_domain::{Page, PageRequest, RoleDraft, RoleStatus, SYSTEM_ADMIN_ROLE_CODE};

use super::*;

use crate::security_admin_ports::{RoleListQuery, UpdateRoleInput};

impl SecurityAdminService {
    /// Returns tenant roles matching the query, ordered by code.
    pub async fn list_roles(
        &self,
        actor: &UserIdentity,
        query: RoleListQuery,
    ) -> AppResult<Vec<Role>> {
        self.require(actor, AdminCapability::RoleManage).await?;
        self.repository.list_roles(actor.tenant_id(), &query).await
    }

    /// Returns one page of tenant roles matching the query.
    pub async fn list_roles_page(
        &self,
        actor: &UserIdentity,
        query: RoleListQuery,
        page: PageRequest,
    ) -> AppResult<Page<Role>> {
        let roles = self.list_roles(actor, query).await?;
        Ok(page.slice(roles))
    }

    /// Returns one role.
    pub async fn get_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<Role> {
        self.require(actor, AdminCapability::RoleManage).await?;
        self.load_role(actor.tenant_id(), role_id).await
    }

    /// Creates a role and emits an audit event.
    ///
    /// Code uniqueness is decided by the repository; duplicates surface as conflicts.
    pub async fn create_role(&self, actor: &UserIdentity, draft: RoleDraft) -> AppResult<Role> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let role = Role::new(draft)?;
        self.repository.insert_role(actor.tenant_id(), &role).await?;

        self.append_audit(
            actor.tenant_id(),
            actor.subject(),
            AuditAction::RoleCreated,
            "mes_role",
            role.role_id().to_string(),
            format!("created role '{}'", role.role_code()),
        )
        .await?;

        Ok(role)
    }

    /// Updates role name and description.
    pub async fn update_role(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let mut role = self.load_role(actor.tenant_id(), role_id).await?;
        role.update_details(input.role_name, input.description)?;
        self.repository.save_role(actor.tenant_id(), &role).await?;

        self.append_audit(
            actor.tenant_id(),
            actor.subject(),
            AuditAction::RoleUpdated,
            "mes_role",
            role_id.to_string(),
            format!("updated role '{}'", role.role_code()),
        )
        .await?;

        Ok(role)
    }

    /// Sets role status. Setting the current status is a no-op that still
    /// returns the role.
    pub async fn set_role_status(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        status: RoleStatus,
    ) -> AppResult<Role> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let role = self.load_role(actor.tenant_id(), role_id).await?;
        self.apply_role_status(actor, role, status).await
    }

    /// Flips role status.
    pub async fn toggle_role_status(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<Role> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let role = self.load_role(actor.tenant_id(), role_id).await?;
        let status = role.status().toggled();
        self.apply_role_status(actor, role, status).await
    }

    /// Deletes a role. Blocked while any subject holds it.
    pub async fn delete_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<()> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let role = self.load_role(actor.tenant_id(), role_id).await?;
        if role.role_code().as_str() == SYSTEM_ADMIN_ROLE_CODE {
            return Err(AppError::Conflict(format!(
                "built-in role '{SYSTEM_ADMIN_ROLE_CODE}' cannot be deleted"
            )));
        }

        self.repository
            .delete_role(actor.tenant_id(), role_id)
            .await?;

        self.append_audit(
            actor.tenant_id(),
            actor.subject(),
            AuditAction::RoleDeleted,
            "mes_role",
            role_id.to_string(),
            format!("deleted role '{}'", role.role_code()),
        )
        .await
    }

    async fn apply_role_status(
        &self,
        actor: &UserIdentity,
        mut role: Role,
        status: RoleStatus,
    ) -> AppResult<Role> {
        if status == RoleStatus::Inactive && role.role_code().as_str() == SYSTEM_ADMIN_ROLE_CODE {
            return Err(AppError::Conflict(format!(
                "built-in role '{SYSTEM_ADMIN_ROLE_CODE}' cannot be deactivated"
            )));
        }

        if !role.set_status(status) {
            return Ok(role);
        }

        self.repository.save_role(actor.tenant_id(), &role).await?;

        self.append_audit(
            actor.tenant_id(),
            actor.subject(),
            AuditAction::RoleStatusChanged,
            "mes_role",
            role.role_id().to_string(),
            format!("set role '{}' to {}", role.role_code(), status.as_str()),
        )
        .await?;

        Ok(role)
    }
}
