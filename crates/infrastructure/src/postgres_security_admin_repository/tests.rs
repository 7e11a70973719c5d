use mes_application::{PermissionListQuery, RoleListQuery, SecurityAdminRepository};
use mes_core::{AppError, TenantId};
use mes_domain::{
    MembershipChange, Permission, PermissionDraft, PermissionModule, Role, RoleDraft, RoleStatus,
};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::PostgresSecurityAdminRepository;

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
        panic!("failed to run migrations for postgres security admin tests: {error}");
    }

    Some(pool)
}

fn role(code: &str) -> Role {
    Role::new(RoleDraft {
        role_code: code.to_owned(),
        role_name: format!("{code} name"),
        description: Some("seeded by test".to_owned()),
    })
    .unwrap_or_else(|_| unreachable!())
}

fn permission(code: &str) -> Permission {
    Permission::new(PermissionDraft {
        permission_code: code.to_owned(),
        permission_name: format!("{code} name"),
        module: PermissionModule::Quality,
        description: None,
    })
    .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn role_round_trips_and_rejects_duplicate_code() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresSecurityAdminRepository::new(pool);
    let tenant_id = TenantId::new();
    let mut stored = role("QA_LEAD");

    assert!(repository.insert_role(tenant_id, &stored).await.is_ok());
    let duplicate = repository.insert_role(tenant_id, &role("QA_LEAD")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    stored.set_status(RoleStatus::Inactive);
    assert!(
        stored
            .update_details("Quality Lead", None)
            .is_ok()
    );
    assert!(repository.save_role(tenant_id, &stored).await.is_ok());

    let found = repository
        .find_role(tenant_id, stored.role_id())
        .await
        .unwrap_or_default();
    assert!(matches!(
        found,
        Some(role) if role.status() == RoleStatus::Inactive
            && role.role_name().as_str() == "Quality Lead"
            && role.description().is_none()
    ));

    let filtered = repository
        .list_roles(
            tenant_id,
            &RoleListQuery {
                status: Some(RoleStatus::Active),
                search: None,
            },
        )
        .await
        .unwrap_or_default();
    assert!(filtered.is_empty());
}

#[tokio::test]
async fn grants_are_idempotent_and_block_permission_delete() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresSecurityAdminRepository::new(pool);
    let tenant_id = TenantId::new();
    let role = role("QA_LEAD");
    let permission = permission("QUALITY_INSPECT");
    assert!(repository.insert_role(tenant_id, &role).await.is_ok());
    assert!(
        repository
            .insert_permission(tenant_id, &permission)
            .await
            .is_ok()
    );

    let first = repository
        .grant_permission(tenant_id, role.role_id(), permission.permission_id())
        .await;
    let second = repository
        .grant_permission(tenant_id, role.role_id(), permission.permission_id())
        .await;
    assert!(matches!(first, Ok(MembershipChange::Applied)));
    assert!(matches!(second, Ok(MembershipChange::Unchanged)));

    let listed = repository
        .list_role_permissions(tenant_id, role.role_id())
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);

    let blocked = repository
        .delete_permission(tenant_id, permission.permission_id())
        .await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    let revoked = repository
        .revoke_permission(tenant_id, role.role_id(), permission.permission_id())
        .await;
    assert!(matches!(revoked, Ok(MembershipChange::Applied)));
    assert!(
        repository
            .delete_permission(tenant_id, permission.permission_id())
            .await
            .is_ok()
    );

    let remaining = repository
        .list_permissions(tenant_id, &PermissionListQuery::default())
        .await
        .unwrap_or_default();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn assigned_role_cannot_be_deleted() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresSecurityAdminRepository::new(pool);
    let tenant_id = TenantId::new();
    let role = role("QA_LEAD");
    assert!(repository.insert_role(tenant_id, &role).await.is_ok());

    let assigned = repository
        .assign_role_to_subject(tenant_id, "lee", role.role_id())
        .await;
    let assigned_again = repository
        .assign_role_to_subject(tenant_id, "lee", role.role_id())
        .await;
    assert!(matches!(assigned, Ok(MembershipChange::Applied)));
    assert!(matches!(assigned_again, Ok(MembershipChange::Unchanged)));

    let assignments = repository
        .list_role_assignments(tenant_id)
        .await
        .unwrap_or_default();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].role_code.as_str(), "QA_LEAD");

    let blocked = repository.delete_role(tenant_id, role.role_id()).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    let removed = repository
        .remove_role_from_subject(tenant_id, "lee", role.role_id())
        .await;
    assert!(matches!(removed, Ok(MembershipChange::Applied)));
    assert!(repository.delete_role(tenant_id, role.role_id()).await.is_ok());
}
