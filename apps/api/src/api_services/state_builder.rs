use std::sync::Arc;

use mes_application::{AuthorizationService, SecurityAdminService};
use mes_infrastructure::{
    InMemorySecurityAdminRepository, PostgresAuditTrail, PostgresAuthorizationRepository,
    PostgresSecurityAdminRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_postgres_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let authorization_service =
        AuthorizationService::new(Arc::new(PostgresAuthorizationRepository::new(pool.clone())));
    let audit_trail = Arc::new(PostgresAuditTrail::new(pool.clone()));
    let security_admin_service = SecurityAdminService::new(
        authorization_service,
        Arc::new(PostgresSecurityAdminRepository::new(pool)),
        audit_trail.clone(),
        audit_trail,
    );

    app_state(security_admin_service, config)
}

pub fn build_memory_app_state(config: &ApiConfig) -> AppState {
    let repository = Arc::new(InMemorySecurityAdminRepository::new());
    let authorization_service = AuthorizationService::new(repository.clone());
    let security_admin_service = SecurityAdminService::new(
        authorization_service,
        repository.clone(),
        repository.clone(),
        repository,
    );

    app_state(security_admin_service, config)
}

fn app_state(security_admin_service: SecurityAdminService, config: &ApiConfig) -> AppState {
    AppState {
        security_admin_service,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
        tenant_id: config.tenant_id,
        storage_backend: config.storage.label(),
    }
}
