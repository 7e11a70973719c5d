use mes_domain::{
    PermissionCode, PermissionStatus, RoleCode, RoleDraft, RoleStatus, SYSTEM_ADMIN_ROLE_CODE,
};

use super::*;

impl SecurityAdminService {
    /// Seeds the first administrator of a tenant.
    ///
    /// While no subject holds the built-in administrator role, ensures the role
    /// exists with every admin capability and assigns it to `subject`. Once an
    /// administrator exists this is a no-op returning `None`, so sign-ins keep
    /// whatever roles the subject currently holds.
    ///
    /// Callers must have authenticated the subject out of band, e.g. with the
    /// bootstrap token.
    pub async fn bootstrap_administrator(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Option<Role>> {
        if self.has_system_admin(tenant_id).await? {
            return Ok(None);
        }

        let mut capability_ids = Vec::with_capacity(AdminCapability::all().len());
        for capability in AdminCapability::all() {
            let permission = self.ensure_capability_permission(tenant_id, *capability).await?;
            capability_ids.push(permission.permission_id());
        }

        let role = self.ensure_system_admin_role(tenant_id).await?;
        for permission_id in capability_ids {
            self.repository
                .grant_permission(tenant_id, role.role_id(), permission_id)
                .await?;
        }

        let change = self
            .repository
            .assign_role_to_subject(tenant_id, subject, role.role_id())
            .await?;

        if change.is_applied() {
            self.append_audit(
                tenant_id,
                subject,
                AuditAction::RoleAssigned,
                "mes_subject_role",
                format!("{subject}:{}", role.role_id()),
                format!("bootstrapped '{subject}' as '{SYSTEM_ADMIN_ROLE_CODE}'"),
            )
            .await?;
        }

        Ok(Some(role))
    }

    async fn has_system_admin(&self, tenant_id: TenantId) -> AppResult<bool> {
        Ok(self
            .repository
            .list_role_assignments(tenant_id)
            .await?
            .iter()
            .any(|assignment| assignment.role_code.as_str() == SYSTEM_ADMIN_ROLE_CODE))
    }

    async fn ensure_capability_permission(
        &self,
        tenant_id: TenantId,
        capability: AdminCapability,
    ) -> AppResult<Permission> {
        let code = PermissionCode::new(capability.code())?;
        if let Some(mut permission) = self
            .repository
            .find_permission_by_code(tenant_id, &code)
            .await?
        {
            if permission.set_status(PermissionStatus::Active) {
                self.repository
                    .save_permission(tenant_id, &permission)
                    .await?;
            }
            return Ok(permission);
        }

        let permission = Permission::new(capability.seed_draft())?;
        match self
            .repository
            .insert_permission(tenant_id, &permission)
            .await
        {
            Ok(()) => Ok(permission),
            Err(AppError::Conflict(_)) => self
                .repository
                .find_permission_by_code(tenant_id, &code)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(format!("permission '{code}' vanished during bootstrap"))
                }),
            Err(error) => Err(error),
        }
    }

    async fn ensure_system_admin_role(&self, tenant_id: TenantId) -> AppResult<Role> {
        let code = RoleCode::new(SYSTEM_ADMIN_ROLE_CODE)?;
        if let Some(mut role) = self.repository.find_role_by_code(tenant_id, &code).await? {
            if role.set_status(RoleStatus::Active) {
                self.repository.save_role(tenant_id, &role).await?;
            }
            return Ok(role);
        }

        let role = Role::new(RoleDraft {
            role_code: SYSTEM_ADMIN_ROLE_CODE.to_owned(),
            role_name: "System Administrator".to_owned(),
            description: Some("Built-in role for bootstrapped administrators".to_owned()),
        })?;

        match self.repository.insert_role(tenant_id, &role).await {
            Ok(()) => Ok(role),
            Err(AppError::Conflict(_)) => self
                .repository
                .find_role_by_code(tenant_id, &code)
                .await?
                .ok_or_else(|| AppError::Internal(format!("role '{code}' vanished during bootstrap"))),
            Err(error) => Err(error),
        }
    }
}
