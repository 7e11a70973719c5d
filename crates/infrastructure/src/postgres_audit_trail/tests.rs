use mes_application::{AuditEvent, AuditLogQuery, AuditLogRepository, AuditRepository};
use mes_core::TenantId;
use mes_domain::AuditAction;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresAuditTrail;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for audit trail tests: {error}");
    }

    Some(pool)
}

fn event(tenant_id: TenantId, subject: &str, action: AuditAction) -> AuditEvent {
    AuditEvent {
        tenant_id,
        subject: subject.to_owned(),
        action,
        resource_type: "mes_role".to_owned(),
        resource_id: "QA_LEAD".to_owned(),
        detail: None,
    }
}

#[tokio::test]
async fn events_are_scoped_to_tenant_and_filterable() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let trail = PostgresAuditTrail::new(pool);
    let tenant_id = TenantId::new();

    for appended in [
        event(tenant_id, "kim", AuditAction::RoleCreated),
        event(tenant_id, "lee", AuditAction::RolePermissionAssigned),
        event(TenantId::new(), "kim", AuditAction::RoleCreated),
    ] {
        assert!(trail.append_event(appended).await.is_ok());
    }

    let all = trail
        .list_recent_entries(tenant_id, AuditLogQuery::default())
        .await
        .unwrap_or_default();
    assert_eq!(all.len(), 2);

    let by_lee = trail
        .list_recent_entries(
            tenant_id,
            AuditLogQuery {
                subject: Some("lee".to_owned()),
                ..AuditLogQuery::default()
            },
        )
        .await
        .unwrap_or_default();
    assert_eq!(by_lee.len(), 1);
    assert_eq!(
        by_lee[0].action,
        AuditAction::RolePermissionAssigned.as_str()
    );
}

#[tokio::test]
async fn offset_pages_past_newest_entries() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let trail = PostgresAuditTrail::new(pool);
    let tenant_id = TenantId::new();
    for _ in 0..3 {
        assert!(
            trail
                .append_event(event(tenant_id, "kim", AuditAction::RoleUpdated))
                .await
                .is_ok()
        );
    }

    let page = trail
        .list_recent_entries(
            tenant_id,
            AuditLogQuery {
                limit: 2,
                offset: 2,
                ..AuditLogQuery::default()
            },
        )
        .await
        .unwrap_or_default();
    assert_eq!(page.len(), 1);
}
