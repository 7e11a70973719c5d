use axum::Json;
use axum::extract::State;
use mes_core::{AppError, NonEmptyString, UserIdentity};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::dto::{BootstrapRequest, UserIdentityResponse};
use crate::error::{ApiJson, ApiResult};
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY, identity_response};

/// Signs in with the shared bootstrap token.
///
/// The first subject to sign in becomes the tenant administrator. Later
/// subjects keep the roles assigned to them. Opens a fresh session either way.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    ApiJson(payload): ApiJson<BootstrapRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    if payload.token != state.bootstrap_token {
        warn!(subject = %payload.subject, "rejected bootstrap token");
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let subject = NonEmptyString::new(payload.subject)?;
    if let Some(role) = state
        .security_admin_service
        .bootstrap_administrator(state.tenant_id, subject.as_str())
        .await?
    {
        info!(subject = %subject.as_str(), role_id = %role.role_id(), "seeded first administrator");
    }

    let identity = UserIdentity::new(subject.as_str(), subject.as_str(), state.tenant_id);

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(subject = %identity.subject(), tenant_id = %identity.tenant_id(), "bootstrap sign-in");
    Ok(Json(identity_response(&state, &identity).await?))
}
