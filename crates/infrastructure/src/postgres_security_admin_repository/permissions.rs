use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_permissions_impl(
        &self,
        tenant_id: TenantId,
        query: &PermissionListQuery,
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, permission_code, permission_name, module, description, status, created_at
            FROM mes_permissions
            WHERE tenant_id = $1
                AND ($2::TEXT IS NULL OR status = $2)
                AND ($3::TEXT IS NULL OR module = $3)
                AND (
                    $4::TEXT IS NULL
                    OR strpos(lower(permission_code), $4) > 0
                    OR strpos(lower(permission_name), $4) > 0
                )
            ORDER BY permission_code
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(query.status.map(|status| status.as_str()))
        .bind(query.module.map(|module| module.as_str()))
        .bind(search_needle(query.search.as_deref()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(PermissionRow::into_permission).collect()
    }

    pub(super) async fn find_permission_impl(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, permission_code, permission_name, module, description, status, created_at
            FROM mes_permissions
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(permission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?
        .map(PermissionRow::into_permission)
        .transpose()
    }

    pub(super) async fn find_permission_by_code_impl(
        &self,
        tenant_id: TenantId,
        permission_code: &PermissionCode,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, permission_code, permission_name, module, description, status, created_at
            FROM mes_permissions
            WHERE tenant_id = $1 AND permission_code = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(permission_code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permission by code: {error}"))
        })?
        .map(PermissionRow::into_permission)
        .transpose()
    }

    pub(super) async fn insert_permission_impl(
        &self,
        tenant_id: TenantId,
        permission: &Permission,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mes_permissions (
                id,
                tenant_id,
                permission_code,
                permission_name,
                module,
                description,
                status,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(permission.permission_id().as_uuid())
        .bind(tenant_id.as_uuid())
        .bind(permission.permission_code().as_str())
        .bind(permission.permission_name().as_str())
        .bind(permission.module().as_str())
        .bind(permission.description())
        .bind(permission.status().as_str())
        .bind(permission.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_conflict(
                error,
                format!(
                    "permission code '{}' already exists",
                    permission.permission_code()
                ),
                "create permission",
            )
        })?;

        Ok(())
    }

    pub(super) async fn save_permission_impl(
        &self,
        tenant_id: TenantId,
        permission: &Permission,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE mes_permissions
            SET permission_name = $3,
                module = $4,
                description = $5,
                status = $6,
                updated_at = now()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(permission.permission_id().as_uuid())
        .bind(permission.permission_name().as_str())
        .bind(permission.module().as_str())
        .bind(permission.description())
        .bind(permission.status().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update permission: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.permission_id()
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_permission_impl(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM mes_permissions
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_reference_conflict(
                error,
                format!("permission '{permission_id}' is still granted to roles"),
                "delete permission",
            )
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }

        Ok(())
    }
}
