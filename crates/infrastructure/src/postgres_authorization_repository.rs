use async_trait::async_trait;
use sqlx::PgPool;

use mes_application::AuthorizationRepository;
use mes_core::{AppError, AppResult, TenantId};

/// PostgreSQL-backed repository for subject permission lookups.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn list_permission_codes_for_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT permissions.permission_code
            FROM mes_subject_roles AS subject_roles
            INNER JOIN mes_roles AS roles
                ON roles.id = subject_roles.role_id
                AND roles.status = 'ACTIVE'
            INNER JOIN mes_role_permissions AS grants
                ON grants.role_id = roles.id
            INNER JOIN mes_permissions AS permissions
                ON permissions.id = grants.permission_id
                AND permissions.status = 'active'
            WHERE subject_roles.tenant_id = $1
                AND subject_roles.subject = $2
            ORDER BY permissions.permission_code
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(subject)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load permissions: {error}")))
    }
}
