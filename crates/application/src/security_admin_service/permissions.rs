use mes_domain::{Page, PageRequest, PermissionDraft, PermissionStatus};

use super::*;

use crate::security_admin_ports::{PermissionListQuery, UpdatePermissionInput};

impl SecurityAdminService {
    /// Returns the permission catalog filtered by the query, ordered by code.
    ///
    /// Role managers may read the catalog so they can build checklists.
    pub async fn list_permissions(
        &self,
        actor: &UserIdentity,
        query: PermissionListQuery,
    ) -> AppResult<Vec<Permission>> {
        self.require_catalog_read(actor).await?;
        self.repository
            .list_permissions(actor.tenant_id(), &query)
            .await
    }

    /// Returns one page of the filtered permission catalog.
    pub async fn list_permissions_page(
        &self,
        actor: &UserIdentity,
        query: PermissionListQuery,
        page: PageRequest,
    ) -> AppResult<Page<Permission>> {
        let permissions = self.list_permissions(actor, query).await?;
        Ok(page.slice(permissions))
    }

    /// Returns one permission.
    pub async fn get_permission(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
    ) -> AppResult<Permission> {
        self.require_catalog_read(actor).await?;
        self.load_permission(actor.tenant_id(), permission_id).await
    }

    /// Creates a permission and emits an audit event.
    pub async fn create_permission(
        &self,
        actor: &UserIdentity,
        draft: PermissionDraft,
    ) -> AppResult<Permission> {
        self.require(actor, AdminCapability::PermissionManage)
            .await?;

        let permission = Permission::new(draft)?;
        self.repository
            .insert_permission(actor.tenant_id(), &permission)
            .await?;

        self.append_audit(
            actor.tenant_id(),
            actor.subject(),
            AuditAction::PermissionCreated,
            "mes_permission",
            permission.permission_id().to_string(),
            format!(
                "created permission '{}' in module {}",
                permission.permission_code(),
                permission.module().as_str()
            ),
        )
        .await?;

        Ok(permission)
    }

    /// Updates permission name, module and description.
    pub async fn update_permission(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<Permission> {
        self.require(actor, AdminCapability::PermissionManage)
            .await?;

        let mut permission = self
            .load_permission(actor.tenant_id(), permission_id)
            .await?;
        permission.update_details(input.permission_name, input.module, input.description)?;
        self.repository
            .save_permission(actor.tenant_id(), &permission)
            .await?;

        self.append_audit(
            actor.tenant_id(),
            actor.subject(),
            AuditAction::PermissionUpdated,
            "mes_permission",
            permission_id.to_string(),
            format!("updated permission '{}'", permission.permission_code()),
        )
        .await?;

        Ok(permission)
    }

    /// Sets permission status. Setting the current status is a no-op.
    pub async fn set_permission_status(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
        status: PermissionStatus,
    ) -> AppResult<Permission> {
        self.require(actor, AdminCapability::PermissionManage)
            .await?;

        let permission = self
            .load_permission(actor.tenant_id(), permission_id)
            .await?;
        self.apply_permission_status(actor, permission, status)
            .await
    }

    /// Flips permission status.
    pub async fn toggle_permission_status(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
    ) -> AppResult<Permission> {
        self.require(actor, AdminCapability::PermissionManage)
            .await?;

        let permission = self
            .load_permission(actor.tenant_id(), permission_id)
            .await?;
        let status = permission.status().toggled();
        self.apply_permission_status(actor, permission, status)
            .await
    }

    /// Deletes a permission. Blocked while any role holds it.
    pub async fn delete_permission(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.require(actor, AdminCapability::PermissionManage)
            .await?;

        let permission = self
            .load_permission(actor.tenant_id(), permission_id)
            .await?;
        self.repository
            .delete_permission(actor.tenant_id(), permission_id)
            .await?;

        self.append_audit(
            actor.tenant_id(),
            actor.subject(),
            AuditAction::PermissionDeleted,
            "mes_permission",
            permission_id.to_string(),
            format!("deleted permission '{}'", permission.permission_code()),
        )
        .await
    }

    async fn require_catalog_read(&self, actor: &UserIdentity) -> AppResult<()> {
        if self
            .authorization_service
            .has_capability(actor, AdminCapability::RoleManage)
            .await?
        {
            return Ok(());
        }

        self.require(actor, AdminCapability::PermissionManage).await
    }

    async fn apply_permission_status(
        &self,
        actor: &UserIdentity,
        mut permission: Permission,
        status: PermissionStatus,
    ) -> AppResult<Permission> {
        if !permission.set_status(status) {
            return Ok(permission);
        }

        self.repository
            .save_permission(actor.tenant_id(), &permission)
            .await?;

        self.append_audit(
            actor.tenant_id(),
            actor.subject(),
            AuditAction::PermissionStatusChanged,
            "mes_permission",
            permission.permission_id().to_string(),
            format!(
                "set permission '{}' to {}",
                permission.permission_code(),
                status.as_str()
            ),
        )
        .await?;

        Ok(permission)
    }
}
