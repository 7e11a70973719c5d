use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_role_permissions_impl(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT
                permissions.id,
                permissions.permission_code,
                permissions.permission_name,
                permissions.module,
                permissions.description,
                permissions.status,
                permissions.created_at
            FROM mes_role_permissions AS grants
            INNER JOIN mes_permissions AS permissions
                ON permissions.id = grants.permission_id
            WHERE grants.tenant_id = $1
                AND grants.role_id = $2
            ORDER BY permissions.permission_code
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list role permissions: {error}"))
        })?;

        rows.into_iter().map(PermissionRow::into_permission).collect()
    }

    pub(super) async fn grant_permission_impl(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO mes_role_permissions (tenant_id, role_id, permission_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_missing_reference(
                error,
                format!("role '{role_id}' or permission '{permission_id}' no longer exists"),
                "grant permission",
            )
        })?
        .rows_affected();

        Ok(MembershipChange::from_applied(rows_affected > 0))
    }

    pub(super) async fn revoke_permission_impl(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM mes_role_permissions
            WHERE tenant_id = $1
                AND role_id = $2
                AND permission_id = $3
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(role_id.as_uuid())
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke permission: {error}")))?
        .rows_affected();

        Ok(MembershipChange::from_applied(rows_affected > 0))
    }

    pub(super) async fn list_role_assignments_impl(
        &self,
        tenant_id: TenantId,
    ) -> AppResult<Vec<RoleAssignment>> {
        let rows = sqlx::query_as::<_, RoleAssignmentRow>(
            r#"
            SELECT
                subject_roles.subject,
                subject_roles.role_id,
                roles.role_code,
                roles.role_name,
                subject_roles.created_at AS assigned_at
            FROM mes_subject_roles AS subject_roles
            INNER JOIN mes_roles AS roles
                ON roles.id = subject_roles.role_id
            WHERE subject_roles.tenant_id = $1
            ORDER BY subject_roles.subject, roles.role_code
            "#,
        )
        .bind(tenant_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list role assignments: {error}")))?;

        rows.into_iter()
            .map(|row| {
                let role_code = RoleCode::new(row.role_code.as_str()).map_err(|error| {
                    AppError::Internal(format!(
                        "invalid stored role code '{}': {error}",
                        row.role_code
                    ))
                })?;

                Ok(RoleAssignment {
                    subject: row.subject,
                    role_id: RoleId::from_uuid(row.role_id),
                    role_code,
                    role_name: row.role_name,
                    assigned_at: row.assigned_at,
                })
            })
            .collect()
    }

    pub(super) async fn assign_role_to_subject_impl(
        &self,
        tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO mes_subject_roles (tenant_id, subject, role_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (tenant_id, subject, role_id) DO NOTHING
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(subject)
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_missing_reference(
                error,
                format!("role '{role_id}' no longer exists"),
                "assign role",
            )
        })?
        .rows_affected();

        Ok(MembershipChange::from_applied(rows_affected > 0))
    }

    pub(super) async fn remove_role_from_subject_impl(
        &self,
        tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM mes_subject_roles
            WHERE tenant_id = $1
                AND subject = $2
                AND role_id = $3
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(subject)
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to remove role assignment: {error}")))?
        .rows_affected();

        Ok(MembershipChange::from_applied(rows_affected > 0))
    }
}
