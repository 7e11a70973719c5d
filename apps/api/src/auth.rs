mod bootstrap;
mod session;

use chrono::Utc;
use mes_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub use bootstrap::bootstrap_handler;
pub use session::{logout_handler, me_handler};

/// Session key holding the signed-in [`UserIdentity`].
pub const SESSION_USER_KEY: &str = "user_identity";
/// Session key holding the sign-in time as a unix timestamp.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";
/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "mes_session";
/// Sessions older than this are refused even while in use.
pub const SESSION_MAX_AGE_SECS: i64 = 12 * 60 * 60;

/// Reads the signed-in identity, if any.
pub async fn session_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}

/// Returns whether the session outlived [`SESSION_MAX_AGE_SECS`].
pub async fn session_expired(session: &Session) -> Result<bool, AppError> {
    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session age: {error}")))?;

    Ok(created_at.is_none_or(|created_at| Utc::now().timestamp() - created_at > SESSION_MAX_AGE_SECS))
}

/// Identity body returned by sign-in and `/auth/me`.
async fn identity_response(
    state: &AppState,
    identity: &UserIdentity,
) -> ApiResult<UserIdentityResponse> {
    let permissions = state
        .security_admin_service
        .effective_permission_codes(identity)
        .await?;

    Ok(UserIdentityResponse::from_identity_with_permissions(
        identity,
        permissions,
    ))
}
