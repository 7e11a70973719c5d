use super::*;

use mes_application::AuditLogQuery;

use crate::dto::AuditLogEntryResponse;

/// `?limit&offset&action&subject`; omitted values fall back to the service defaults.
#[derive(Debug, Deserialize)]
pub struct AuditLogParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub subject: Option<String>,
}

impl From<AuditLogParams> for AuditLogQuery {
    fn from(params: AuditLogParams) -> Self {
        let defaults = Self::default();
        Self {
            limit: params.limit.unwrap_or(defaults.limit),
            offset: params.offset.unwrap_or(defaults.offset),
            action: params.action.filter(|action| !action.trim().is_empty()),
            subject: params.subject.filter(|subject| !subject.trim().is_empty()),
        }
    }
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiQuery(params): ApiQuery<AuditLogParams>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .security_admin_service
        .list_audit_log(&user, params.into())
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
