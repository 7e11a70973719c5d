use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use mes_application::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
use mes_core::{AppError, AppResult, TenantId};

#[cfg(test)]
mod tests;

/// PostgreSQL audit trail: appends security events and reads them back newest first.
#[derive(Clone)]
pub struct PostgresAuditTrail {
    pool: PgPool,
}

impl PostgresAuditTrail {
    /// Creates a trail over the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditEventRow {
    event_id: Uuid,
    subject: String,
    action: String,
    resource_type: String,
    resource_id: String,
    detail: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AuditEventRow> for AuditLogEntry {
    fn from(row: AuditEventRow) -> Self {
        Self {
            event_id: row.event_id.to_string(),
            subject: row.subject,
            action: row.action,
            resource_type: row.resource_type,
            resource_id: row.resource_id,
            detail: row.detail,
            created_at: row.created_at,
        }
    }
}

fn to_i64(value: usize, field: &str) -> AppResult<i64> {
    i64::try_from(value).map_err(|_| AppError::Validation(format!("{field} is out of range")))
}

#[async_trait]
impl AuditRepository for PostgresAuditTrail {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mes_audit_events (
                event_id, tenant_id, subject, action, resource_type, resource_id, detail
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.tenant_id.as_uuid())
        .bind(event.subject.as_str())
        .bind(event.action.as_str())
        .bind(event.resource_type.as_str())
        .bind(event.resource_id.as_str())
        .bind(event.detail.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to record '{}' for subject '{}': {error}",
                event.action.as_str(),
                event.subject
            ))
        })?;

        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditTrail {
    async fn list_recent_entries(
        &self,
        tenant_id: TenantId,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let limit = to_i64(query.limit, "limit")?;
        let offset = to_i64(query.offset, "offset")?;

        let rows = sqlx::query_as::<_, AuditEventRow>(
            r#"
            SELECT event_id, subject, action, resource_type, resource_id, detail, created_at
            FROM mes_audit_events
            WHERE tenant_id = $1
                AND ($2::TEXT IS NULL OR action = $2)
                AND ($3::TEXT IS NULL OR subject = $3)
            ORDER BY created_at DESC, event_id DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(query.action.as_deref())
        .bind(query.subject.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read audit events: {error}")))?;

        Ok(rows.into_iter().map(AuditLogEntry::from).collect())
    }
}
