use mes_core::UserIdentity;
use mes_domain::Page;
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
}

/// API representation of the authenticated operator.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub tenant_id: String,
    /// Effective permission codes: active permissions of active roles.
    pub permissions: Vec<String>,
}

impl UserIdentityResponse {
    pub fn from_identity_with_permissions(identity: &UserIdentity, permissions: Vec<String>) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            tenant_id: identity.tenant_id().to_string(),
            permissions,
        }
    }
}

/// List payload: a bare array, or `{content, totalElements}` when a page was requested.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    All(Vec<T>),
    Paged(Page<T>),
}
