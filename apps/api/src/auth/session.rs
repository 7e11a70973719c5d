use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use mes_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::UserIdentityResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::{identity_response, session_identity};

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let identity = session_identity(&session).await?;

    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to end session: {error}")))?;

    if let Some(identity) = identity {
        info!(subject = %identity.subject(), "signed out");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    Ok(Json(identity_response(&state, &identity).await?))
}
