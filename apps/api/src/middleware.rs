use axum::extract::{Request, State};
use axum::http::{Method, header};
use axum::middleware::Next;
use axum::response::Response;
use mes_core::AppError;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::auth::{session_expired, session_identity};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    if session_expired(&session).await? {
        info!(subject = %identity.subject(), "session reached its maximum age");
        session
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to end session: {error}")))?;
        return Err(AppError::Unauthorized("session expired".to_owned()).into());
    }

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Blocks browser mutations that come from a foreign origin.
///
/// Requests without browser provenance headers, such as the console client,
/// pass through; the session cookie is still required on protected routes.
pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if headers
            .get("sec-fetch-site")
            .is_some_and(|value| value == "cross-site")
        {
            warn!(path = %request.uri().path(), "blocked cross-site mutation");
            return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
        }

        if let Some(origin) = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            && !origin_matches(origin, state.frontend_url.as_str())
        {
            warn!(origin = %origin, "blocked mutation from foreign origin");
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn origin_matches(origin: &str, allowed_origin: &str) -> bool {
    origin.trim_end_matches('/') == allowed_origin.trim_end_matches('/')
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
