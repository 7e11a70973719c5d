use std::sync::Arc;

use async_trait::async_trait;
use mes_core::{AppError, AppResult, TenantId, UserIdentity};
use mes_domain::AdminCapability;

/// Repository port for permission lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists effective permission codes for a subject in a tenant.
    ///
    /// Only active permissions reached through active roles count.
    async fn list_permission_codes_for_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Vec<String>>;
}

/// Application service for tenant-scoped authorization checks.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Ensures the actor holds the capability in its tenant.
    pub async fn require_capability(
        &self,
        actor: &UserIdentity,
        capability: AdminCapability,
    ) -> AppResult<()> {
        if self.has_capability(actor, capability).await? {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' is missing permission '{}' in tenant '{}'",
            actor.subject(),
            capability.code(),
            actor.tenant_id()
        )))
    }

    /// Returns whether the actor currently holds the capability.
    pub async fn has_capability(
        &self,
        actor: &UserIdentity,
        capability: AdminCapability,
    ) -> AppResult<bool> {
        let codes = self
            .repository
            .list_permission_codes_for_subject(actor.tenant_id(), actor.subject())
            .await?;

        Ok(codes.iter().any(|code| code == capability.code()))
    }

    /// Returns effective permission codes for the actor, sorted and deduplicated.
    pub async fn effective_permission_codes(&self, actor: &UserIdentity) -> AppResult<Vec<String>> {
        let mut codes = self
            .repository
            .list_permission_codes_for_subject(actor.tenant_id(), actor.subject())
            .await?;
        codes.sort();
        codes.dedup();
        Ok(codes)
    }
}
