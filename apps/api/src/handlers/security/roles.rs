use mes_application::{RoleListQuery, UpdateRoleInput};
use mes_domain::{RoleDraft, RoleStatus};

use super::*;

use crate::dto::{CreateRoleRequest, RoleResponse, UpdateRoleRequest};

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<ListResponse<RoleResponse>>> {
    let filters = RoleListQuery {
        status: parse_optional::<RoleStatus>(query.status.as_deref())?,
        search: query.search.clone(),
    };

    let response = match query.page_request()? {
        Some(page) => ListResponse::Paged(
            state
                .security_admin_service
                .list_roles_page(&user, filters, page)
                .await?
                .map(RoleResponse::from),
        ),
        None => ListResponse::All(
            state
                .security_admin_service
                .list_roles(&user, filters)
                .await?
                .into_iter()
                .map(RoleResponse::from)
                .collect(),
        ),
    };

    Ok(Json(response))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .get_role(&user, parse_role_id(&role_id)?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .security_admin_service
        .create_role(
            &user,
            RoleDraft {
                role_code: payload.role_code,
                role_name: payload.role_name,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .update_role(
            &user,
            parse_role_id(&role_id)?,
            UpdateRoleInput {
                role_name: payload.role_name,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_role(&user, parse_role_id(&role_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn activate_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .set_role_status(&user, parse_role_id(&role_id)?, RoleStatus::Active)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn deactivate_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .set_role_status(&user, parse_role_id(&role_id)?, RoleStatus::Inactive)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn toggle_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .security_admin_service
        .toggle_role_status(&user, parse_role_id(&role_id)?)
        .await?;

    Ok(Json(RoleResponse::from(role)))
}
