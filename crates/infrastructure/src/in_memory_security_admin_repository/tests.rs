use mes_application::{
    AuditEvent, AuditLogQuery, AuditLogRepository, AuditRepository, AuthorizationRepository,
    PermissionListQuery, RoleListQuery, SecurityAdminRepository,
};
use mes_core::{AppError, TenantId};
use mes_domain::{
    AuditAction, MembershipChange, Permission, PermissionDraft, PermissionModule,
    PermissionStatus, Role, RoleDraft, RoleStatus,
};

use super::InMemorySecurityAdminRepository;

fn role(code: &str) -> Role {
    Role::new(RoleDraft {
        role_code: code.to_owned(),
        role_name: format!("{code} name"),
        description: None,
    })
    .unwrap_or_else(|_| unreachable!())
}

fn permission(code: &str, module: PermissionModule) -> Permission {
    Permission::new(PermissionDraft {
        permission_code: code.to_owned(),
        permission_name: format!("{code} name"),
        module,
        description: None,
    })
    .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn role_codes_are_unique_per_tenant() {
    let repository = InMemorySecurityAdminRepository::new();
    let left_tenant = TenantId::new();
    let right_tenant = TenantId::new();

    let first = repository.insert_role(left_tenant, &role("QA_LEAD")).await;
    let duplicate = repository.insert_role(left_tenant, &role("QA_LEAD")).await;
    let other_tenant = repository.insert_role(right_tenant, &role("QA_LEAD")).await;

    assert!(first.is_ok());
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
    assert!(other_tenant.is_ok());

    let listed = repository
        .list_roles(left_tenant, &RoleListQuery::default())
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn list_roles_is_ordered_by_code() {
    let repository = InMemorySecurityAdminRepository::new();
    let tenant_id = TenantId::new();
    for code in ["WAREHOUSE_CLERK", "ADMIN_AUDITOR", "QA_LEAD"] {
        assert!(repository.insert_role(tenant_id, &role(code)).await.is_ok());
    }

    let codes: Vec<String> = repository
        .list_roles(tenant_id, &RoleListQuery::default())
        .await
        .unwrap_or_default()
        .iter()
        .map(|role| role.role_code().as_str().to_owned())
        .collect();

    assert_eq!(codes, vec!["ADMIN_AUDITOR", "QA_LEAD", "WAREHOUSE_CLERK"]);
}

#[tokio::test]
async fn grants_are_a_set() {
    let repository = InMemorySecurityAdminRepository::new();
    let tenant_id = TenantId::new();
    let role = role("QA_LEAD");
    let permission = permission("QUALITY_INSPECT", PermissionModule::Quality);
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
    let listed = repository
        .list_role_permissions(tenant_id, role.role_id())
        .await
        .unwrap_or_default();

    assert!(matches!(first, Ok(MembershipChange::Applied)));
    assert!(matches!(second, Ok(MembershipChange::Unchanged)));
    assert_eq!(listed.len(), 1);

    let revoked = repository
        .revoke_permission(tenant_id, role.role_id(), permission.permission_id())
        .await;
    let revoked_again = repository
        .revoke_permission(tenant_id, role.role_id(), permission.permission_id())
        .await;
    assert!(matches!(revoked, Ok(MembershipChange::Applied)));
    assert!(matches!(revoked_again, Ok(MembershipChange::Unchanged)));
}

#[tokio::test]
async fn delete_is_blocked_by_references() {
    let repository = InMemorySecurityAdminRepository::new();
    let tenant_id = TenantId::new();
    let role = role("QA_LEAD");
    let permission = permission("QUALITY_INSPECT", PermissionModule::Quality);
    assert!(repository.insert_role(tenant_id, &role).await.is_ok());
    assert!(
        repository
            .insert_permission(tenant_id, &permission)
            .await
            .is_ok()
    );
    assert!(
        repository
            .grant_permission(tenant_id, role.role_id(), permission.permission_id())
            .await
            .is_ok()
    );
    assert!(
        repository
            .assign_role_to_subject(tenant_id, "lee", role.role_id())
            .await
            .is_ok()
    );

    let permission_delete = repository
        .delete_permission(tenant_id, permission.permission_id())
        .await;
    let role_delete = repository.delete_role(tenant_id, role.role_id()).await;
    assert!(matches!(permission_delete, Err(AppError::Conflict(_))));
    assert!(matches!(role_delete, Err(AppError::Conflict(_))));

    let unassigned = repository
        .remove_role_from_subject(tenant_id, "lee", role.role_id())
        .await;
    let role_delete = repository.delete_role(tenant_id, role.role_id()).await;
    let permission_delete = repository
        .delete_permission(tenant_id, permission.permission_id())
        .await;

    assert!(matches!(unassigned, Ok(MembershipChange::Applied)));
    assert!(role_delete.is_ok());
    assert!(permission_delete.is_ok());
}

#[tokio::test]
async fn memberships_require_existing_rows() {
    let repository = InMemorySecurityAdminRepository::new();
    let tenant_id = TenantId::new();
    let role = role("QA_LEAD");
    let permission = permission("QUALITY_INSPECT", PermissionModule::Quality);
    assert!(repository.insert_role(tenant_id, &role).await.is_ok());
    assert!(
        repository
            .insert_permission(tenant_id, &permission)
            .await
            .is_ok()
    );
    assert!(repository.delete_role(tenant_id, role.role_id()).await.is_ok());

    let granted = repository
        .grant_permission(tenant_id, role.role_id(), permission.permission_id())
        .await;
    let assigned = repository
        .assign_role_to_subject(tenant_id, "lee", role.role_id())
        .await;
    let other_tenant = repository
        .grant_permission(TenantId::new(), role.role_id(), permission.permission_id())
        .await;

    assert!(matches!(granted, Err(AppError::NotFound(_))));
    assert!(matches!(assigned, Err(AppError::NotFound(_))));
    assert!(matches!(other_tenant, Err(AppError::NotFound(_))));
    assert!(
        repository
            .list_role_assignments(tenant_id)
            .await
            .unwrap_or_default()
            .is_empty()
    );
    assert!(
        repository
            .list_permission_codes_for_subject(tenant_id, "lee")
            .await
            .unwrap_or_default()
            .is_empty()
    );
}

#[tokio::test]
async fn effective_codes_skip_inactive_roles_and_permissions() {
    let repository = InMemorySecurityAdminRepository::new();
    let tenant_id = TenantId::new();
    let mut role = role("QA_LEAD");
    let inspect = permission("QUALITY_INSPECT", PermissionModule::Quality);
    let mut release = permission("QUALITY_RELEASE", PermissionModule::Quality);
    release.set_status(PermissionStatus::Inactive);

    assert!(repository.insert_role(tenant_id, &role).await.is_ok());
    for permission in [&inspect, &release] {
        assert!(
            repository
                .insert_permission(tenant_id, permission)
                .await
                .is_ok()
        );
        assert!(
            repository
                .grant_permission(tenant_id, role.role_id(), permission.permission_id())
                .await
                .is_ok()
        );
    }
    assert!(
        repository
            .assign_role_to_subject(tenant_id, "lee", role.role_id())
            .await
            .is_ok()
    );

    let codes = repository
        .list_permission_codes_for_subject(tenant_id, "lee")
        .await
        .unwrap_or_default();
    assert_eq!(codes, vec!["QUALITY_INSPECT".to_owned()]);

    role.set_status(RoleStatus::Inactive);
    assert!(repository.save_role(tenant_id, &role).await.is_ok());
    let codes = repository
        .list_permission_codes_for_subject(tenant_id, "lee")
        .await
        .unwrap_or_default();
    assert!(codes.is_empty());
}

#[tokio::test]
async fn permission_filters_apply_module_and_search() {
    let repository = InMemorySecurityAdminRepository::new();
    let tenant_id = TenantId::new();
    for (code, module) in [
        ("QUALITY_INSPECT", PermissionModule::Quality),
        ("STOCK_ADJUST", PermissionModule::Inventory),
        ("STOCK_VIEW", PermissionModule::Inventory),
    ] {
        assert!(
            repository
                .insert_permission(tenant_id, &permission(code, module))
                .await
                .is_ok()
        );
    }

    let inventory = repository
        .list_permissions(
            tenant_id,
            &PermissionListQuery {
                module: Some(PermissionModule::Inventory),
                search: Some("adjust".to_owned()),
                ..PermissionListQuery::default()
            },
        )
        .await
        .unwrap_or_default();

    assert_eq!(inventory.len(), 1);
    assert_eq!(inventory[0].permission_code().as_str(), "STOCK_ADJUST");
}

#[tokio::test]
async fn audit_entries_are_newest_first_and_filtered() {
    let repository = InMemorySecurityAdminRepository::new();
    let tenant_id = TenantId::new();
    for (subject, action) in [
        ("kim", AuditAction::RoleCreated),
        ("lee", AuditAction::RoleUpdated),
        ("kim", AuditAction::RoleDeleted),
    ] {
        let appended = repository
            .append_event(AuditEvent {
                tenant_id,
                subject: subject.to_owned(),
                action,
                resource_type: "mes_role".to_owned(),
                resource_id: "r1".to_owned(),
                detail: None,
            })
            .await;
        assert!(appended.is_ok());
    }

    let all = repository
        .list_recent_entries(tenant_id, AuditLogQuery::default())
        .await
        .unwrap_or_default();
    let kim_only = repository
        .list_recent_entries(
            tenant_id,
            AuditLogQuery {
                subject: Some("kim".to_owned()),
                limit: 1,
                ..AuditLogQuery::default()
            },
        )
        .await
        .unwrap_or_default();

    assert_eq!(all.len(), 3);
    assert_eq!(all[0].action, "security.role.deleted");
    assert_eq!(kim_only.len(), 1);
    assert_eq!(kim_only[0].action, "security.role.deleted");
}
