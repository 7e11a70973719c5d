use super::*;

use crate::audit_ports::{AuditLogEntry, AuditLogQuery};

/// Largest audit page returned in one call.
const AUDIT_LOG_MAX_LIMIT: usize = 500;

impl SecurityAdminService {
    /// Returns recent audit entries, newest first.
    pub async fn list_audit_log(
        &self,
        actor: &UserIdentity,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        self.require(actor, AdminCapability::AuditRead).await?;

        if query.limit == 0 || query.limit > AUDIT_LOG_MAX_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {AUDIT_LOG_MAX_LIMIT}"
            )));
        }

        self.audit_log_repository
            .list_recent_entries(actor.tenant_id(), query)
            .await
    }

    /// Returns the effective permission codes of the actor.
    pub async fn effective_permission_codes(&self, actor: &UserIdentity) -> AppResult<Vec<String>> {
        self.authorization_service
            .effective_permission_codes(actor)
            .await
    }
}
