use std::sync::Arc;

use mes_core::{AppError, AppResult, TenantId, UserIdentity};
use mes_domain::{AdminCapability, AuditAction, Permission, PermissionId, Role, RoleId};

use crate::audit_ports::{AuditEvent, AuditLogRepository, AuditRepository};
use crate::authorization_service::AuthorizationService;
use crate::security_admin_ports::SecurityAdminRepository;

mod assignments;
mod audit;
mod bootstrap;
mod permissions;
mod role_permissions;
mod roles;

#[cfg(test)]
mod tests;

/// Application service for role and permission administration.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn SecurityAdminRepository>,
    audit_log_repository: Arc<dyn AuditLogRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn SecurityAdminRepository>,
        audit_log_repository: Arc<dyn AuditLogRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            audit_log_repository,
            audit_repository,
        }
    }

    async fn require(&self, actor: &UserIdentity, capability: AdminCapability) -> AppResult<()> {
        self.authorization_service
            .require_capability(actor, capability)
            .await
    }

    async fn load_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<Role> {
        self.repository
            .find_role(tenant_id, role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }

    async fn load_permission(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<Permission> {
        self.repository
            .find_permission(tenant_id, permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' was not found"))
            })
    }

    async fn append_audit(
        &self,
        tenant_id: TenantId,
        subject: &str,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                tenant_id,
                subject: subject.to_owned(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}
