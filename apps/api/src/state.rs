use mes_application::SecurityAdminService;
use mes_core::TenantId;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub security_admin_service: SecurityAdminService,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub tenant_id: TenantId,
    pub storage_backend: &'static str,
}
