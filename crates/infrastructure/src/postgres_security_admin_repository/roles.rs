use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_roles_impl(
        &self,
        tenant_id: TenantId,
        query: &RoleListQuery,
    ) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, role_code, role_name, description, status, created_at
            FROM mes_roles
            WHERE tenant_id = $1
                AND ($2::TEXT IS NULL OR status = $2)
                AND (
                    $3::TEXT IS NULL
                    OR strpos(lower(role_code), $3) > 0
                    OR strpos(lower(role_name), $3) > 0
                )
            ORDER BY role_code
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(query.status.map(|status| status.as_str()))
        .bind(search_needle(query.search.as_deref()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        rows.into_iter().map(RoleRow::into_role).collect()
    }

    pub(super) async fn find_role_impl(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, role_code, role_name, description, status, created_at
            FROM mes_roles
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?
        .map(RoleRow::into_role)
        .transpose()
    }

    pub(super) async fn find_role_by_code_impl(
        &self,
        tenant_id: TenantId,
        role_code: &RoleCode,
    ) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, role_code, role_name, description, status, created_at
            FROM mes_roles
            WHERE tenant_id = $1 AND role_code = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role_code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role by code: {error}")))?
        .map(RoleRow::into_role)
        .transpose()
    }

    pub(super) async fn insert_role_impl(&self, tenant_id: TenantId, role: &Role) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mes_roles (id, tenant_id, role_code, role_name, description, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(role.role_id().as_uuid())
        .bind(tenant_id.as_uuid())
        .bind(role.role_code().as_str())
        .bind(role.role_name().as_str())
        .bind(role.description())
        .bind(role.status().as_str())
        .bind(role.created_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_conflict(
                error,
                format!("role code '{}' already exists", role.role_code()),
                "create role",
            )
        })?;

        Ok(())
    }

    pub(super) async fn save_role_impl(&self, tenant_id: TenantId, role: &Role) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE mes_roles
            SET role_name = $3,
                description = $4,
                status = $5,
                updated_at = now()
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role.role_id().as_uuid())
        .bind(role.role_name().as_str())
        .bind(role.description())
        .bind(role.status().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update role: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' was not found",
                role.role_id()
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_role_impl(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM mes_roles
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_reference_conflict(
                error,
                format!("role '{role_id}' is still assigned to subjects"),
                "delete role",
            )
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' was not found")));
        }

        Ok(())
    }
}
