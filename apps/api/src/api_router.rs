use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post};
use mes_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::handlers::security;
use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


pub fn build_router<S>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<S>,
) -> Result<Router, AppError>
where
    S: SessionStore + Clone,
{
    let protected_routes = Router::new()
        .route(
            "/api/roles",
            get(security::list_roles_handler).post(security::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(security::get_role_handler)
                .put(security::update_role_handler)
                .delete(security::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/activate",
            post(security::activate_role_handler),
        )
        .route(
            "/api/roles/{role_id}/deactivate",
            post(security::deactivate_role_handler),
        )
        .route(
            "/api/roles/{role_id}/toggle-active",
            post(security::toggle_role_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            get(security::list_role_permissions_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions/{permission_id}",
            post(security::assign_permission_handler).delete(security::remove_permission_handler),
        )
        .route(
            "/api/permissions",
            get(security::list_permissions_handler).post(security::create_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            get(security::get_permission_handler)
                .put(security::update_permission_handler)
                .delete(security::delete_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}/activate",
            post(security::activate_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}/deactivate",
            post(security::deactivate_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}/toggle-active",
            post(security::toggle_permission_handler),
        )
        .route(
            "/api/role-assignments",
            get(security::list_role_assignments_handler).post(security::assign_role_handler),
        )
        .route(
            "/api/role-assignments/{subject}/{role_id}",
            delete(security::unassign_role_handler),
        )
        .route("/api/audit-log", get(security::list_audit_log_handler))
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
