use mes_application::{PermissionListQuery, UpdatePermissionInput};
use mes_domain::{PermissionDraft, PermissionModule, PermissionStatus};

use super::*;

use crate::dto::{CreatePermissionRequest, PermissionResponse, UpdatePermissionRequest};

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<ListResponse<PermissionResponse>>> {
    let filters = PermissionListQuery {
        status: parse_optional::<PermissionStatus>(query.status.as_deref())?,
        module: parse_optional::<PermissionModule>(query.module.as_deref())?,
        search: query.search.clone(),
    };

    let response = match query.page_request()? {
        Some(page) => ListResponse::Paged(
            state
                .security_admin_service
                .list_permissions_page(&user, filters, page)
                .await?
                .map(PermissionResponse::from),
        ),
        None => ListResponse::All(
            state
                .security_admin_service
                .list_permissions(&user, filters)
                .await?
                .into_iter()
                .map(PermissionResponse::from)
                .collect(),
        ),
    };

    Ok(Json(response))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .get_permission(&user, parse_permission_id(&permission_id)?)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .security_admin_service
        .create_permission(
            &user,
            PermissionDraft {
                permission_code: payload.permission_code,
                permission_name: payload.permission_name,
                module: PermissionModule::from_str(payload.module.as_str())?,
                description: payload.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
    ApiJson(payload): ApiJson<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .update_permission(
            &user,
            parse_permission_id(&permission_id)?,
            UpdatePermissionInput {
                permission_name: payload.permission_name,
                module: PermissionModule::from_str(payload.module.as_str())?,
                description: payload.description,
            },
        )
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_permission(&user, parse_permission_id(&permission_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn activate_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .set_permission_status(
            &user,
            parse_permission_id(&permission_id)?,
            PermissionStatus::Active,
        )
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn deactivate_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .set_permission_status(
            &user,
            parse_permission_id(&permission_id)?,
            PermissionStatus::Inactive,
        )
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn toggle_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .toggle_permission_status(&user, parse_permission_id(&permission_id)?)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}
