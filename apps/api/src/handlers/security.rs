use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use mes_core::UserIdentity;
use mes_domain::{PageRequest, PermissionId, RoleId};

use crate::dto::ListResponse;
use crate::error::{ApiJson, ApiQuery, ApiResult};
use crate::state::AppState;

mod assignments;
mod audit;
mod permissions;
mod role_permissions;
mod roles;

pub use assignments::{
    assign_role_handler, list_role_assignments_handler, unassign_role_handler,
};
pub use audit::list_audit_log_handler;
pub use permissions::{
    activate_permission_handler, create_permission_handler, deactivate_permission_handler,
    delete_permission_handler, get_permission_handler, list_permissions_handler,
    toggle_permission_handler, update_permission_handler,
};
pub use role_permissions::{
    assign_permission_handler, list_role_permissions_handler, remove_permission_handler,
};
pub use roles::{
    activate_role_handler, create_role_handler, deactivate_role_handler, delete_role_handler,
    get_role_handler, list_roles_handler, toggle_role_handler, update_role_handler,
};

/// Shared list parameters. `page` switches the response to the paged shape.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub status: Option<String>,
    pub module: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> ApiResult<Option<PageRequest>> {
        match self.page {
            Some(page) => Ok(Some(PageRequest::new(page, self.size)?)),
            None => Ok(None),
        }
    }
}

fn parse_role_id(value: &str) -> ApiResult<RoleId> {
    Ok(RoleId::from_str(value)?)
}

fn parse_permission_id(value: &str) -> ApiResult<PermissionId> {
    Ok(PermissionId::from_str(value)?)
}

fn parse_optional<T>(value: Option<&str>) -> ApiResult<Option<T>>
where
    T: FromStr<Err = mes_core::AppError>,
{
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(T::from_str)
        .transpose()
        .map_err(Into::into)
}
