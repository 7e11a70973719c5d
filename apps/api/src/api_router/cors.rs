use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use mes_core::AppError;
use tower_http::cors::CorsLayer;

/// Methods the role and permission resources are reachable with.
const RESOURCE_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Allows the admin frontend origin to call the API with its session cookie.
pub(super) fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/')).map_err(|error| {
        AppError::Validation(format!("FRONTEND_URL '{frontend_url}' is not a valid origin: {error}"))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(RESOURCE_METHODS)
        .allow_headers([ACCEPT, CONTENT_TYPE]))
}
