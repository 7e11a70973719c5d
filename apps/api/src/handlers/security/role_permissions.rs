use super::*;

use crate::dto::PermissionResponse;

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .security_admin_service
        .list_role_permissions(&user, parse_role_id(&role_id)?)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn assign_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((role_id, permission_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .assign_permission(
            &user,
            parse_role_id(&role_id)?,
            parse_permission_id(&permission_id)?,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((role_id, permission_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .remove_permission(
            &user,
            parse_role_id(&role_id)?,
            parse_permission_id(&permission_id)?,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
