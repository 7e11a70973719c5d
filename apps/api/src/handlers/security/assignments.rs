use super::*;

use crate::dto::{AssignRoleRequest, RoleAssignmentResponse};

pub async fn list_role_assignments_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<RoleAssignmentResponse>>> {
    let assignments = state
        .security_admin_service
        .list_role_assignments(&user)
        .await?
        .into_iter()
        .map(RoleAssignmentResponse::from)
        .collect();

    Ok(Json(assignments))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<AssignRoleRequest>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .assign_role(
            &user,
            payload.subject.as_str(),
            parse_role_id(&payload.role_id)?,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((subject, role_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .unassign_role(&user, subject.as_str(), parse_role_id(&role_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
