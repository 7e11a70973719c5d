use mes_domain::MembershipChange;

use super::*;

impl SecurityAdminService {
    /// Returns the current permission snapshot of a role, ordered by code.
    pub async fn list_role_permissions(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>> {
        self.require(actor, AdminCapability::RoleManage).await?;
        self.load_role(actor.tenant_id(), role_id).await?;

        self.repository
            .list_role_permissions(actor.tenant_id(), role_id)
            .await
    }

    /// Grants a permission to a role. Granting a held permission is a no-op.
    pub async fn assign_permission(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let role = self.load_role(actor.tenant_id(), role_id).await?;
        let permission = self
            .load_permission(actor.tenant_id(), permission_id)
            .await?;

        let change = self
            .repository
            .grant_permission(actor.tenant_id(), role_id, permission_id)
            .await?;

        if change.is_applied() {
            self.append_audit(
                actor.tenant_id(),
                actor.subject(),
                AuditAction::RolePermissionAssigned,
                "mes_role_permission",
                format!("{role_id}:{permission_id}"),
                format!(
                    "granted '{}' to role '{}'",
                    permission.permission_code(),
                    role.role_code()
                ),
            )
            .await?;
        }

        Ok(change)
    }

    /// Revokes a permission from a role. Revoking an absent permission is a no-op.
    pub async fn remove_permission(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let role = self.load_role(actor.tenant_id(), role_id).await?;
        let permission = self
            .load_permission(actor.tenant_id(), permission_id)
            .await?;

        let change = self
            .repository
            .revoke_permission(actor.tenant_id(), role_id, permission_id)
            .await?;

        if change.is_applied() {
            self.append_audit(
                actor.tenant_id(),
                actor.subject(),
                AuditAction::RolePermissionRemoved,
                "mes_role_permission",
                format!("{role_id}:{permission_id}"),
                format!(
                    "revoked '{}' from role '{}'",
                    permission.permission_code(),
                    role.role_code()
                ),
            )
            .await?;
        }

        Ok(change)
    }
}
