use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use mes_core::{AppError, AppResult, TenantId, UserIdentity};
use mes_domain::{
    AdminCapability, MembershipChange, PageRequest, Permission, PermissionCode, PermissionDraft,
    PermissionId, PermissionModule, PermissionStatus, Role, RoleCode, RoleDraft, RoleId,
    RolePermissionSet, RoleStatus, SYSTEM_ADMIN_ROLE_CODE,
};

use crate::audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
use crate::authorization_service::{AuthorizationRepository, AuthorizationService};
use crate::security_admin_ports::{
    PermissionListQuery, RoleAssignment, RoleListQuery, SecurityAdminRepository, UpdateRoleInput,
};

use super::SecurityAdminService;

struct FakeAuthorizationRepository {
    codes: HashMap<(TenantId, String), Vec<String>>,
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn list_permission_codes_for_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Vec<String>> {
        Ok(self
            .codes
            .get(&(tenant_id, subject.to_owned()))
            .cloned()
            .unwrap_or_default())
    }
}

#[derive(Default)]
struct FakeSecurityAdminRepository {
    roles: Mutex<Vec<Role>>,
    permissions: Mutex<Vec<Permission>>,
    grants: Mutex<HashMap<RoleId, RolePermissionSet>>,
    assignments: Mutex<Vec<(String, RoleId)>>,
}

#[async_trait]
impl SecurityAdminRepository for FakeSecurityAdminRepository {
    async fn list_roles(&self, _tenant_id: TenantId, query: &RoleListQuery) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self
            .roles
            .lock()
            .await
            .iter()
            .filter(|role| query.matches(role))
            .cloned()
            .collect();
        roles.sort_by(|left, right| left.role_code().cmp(right.role_code()));
        Ok(roles)
    }

    async fn find_role(&self, _tenant_id: TenantId, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.role_id() == role_id)
            .cloned())
    }

    async fn find_role_by_code(
        &self,
        _tenant_id: TenantId,
        role_code: &RoleCode,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.role_code() == role_code)
            .cloned())
    }

    async fn insert_role(&self, _tenant_id: TenantId, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if roles
            .iter()
            .any(|stored| stored.role_code() == role.role_code())
        {
            return Err(AppError::Conflict(format!(
                "role code '{}' already exists",
                role.role_code()
            )));
        }
        roles.push(role.clone());
        Ok(())
    }

    async fn save_role(&self, _tenant_id: TenantId, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        let stored = roles
            .iter_mut()
            .find(|stored| stored.role_id() == role.role_id())
            .ok_or_else(|| AppError::NotFound("role".to_owned()))?;
        *stored = role.clone();
        Ok(())
    }

    async fn delete_role(&self, _tenant_id: TenantId, role_id: RoleId) -> AppResult<()> {
        if self
            .assignments
            .lock()
            .await
            .iter()
            .any(|(_, stored_role_id)| *stored_role_id == role_id)
        {
            return Err(AppError::Conflict("role is assigned".to_owned()));
        }
        self.roles
            .lock()
            .await
            .retain(|role| role.role_id() != role_id);
        self.grants.lock().await.remove(&role_id);
        Ok(())
    }

    async fn list_permissions(
        &self,
        _tenant_id: TenantId,
        query: &PermissionListQuery,
    ) -> AppResult<Vec<Permission>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .filter(|permission| query.matches(permission))
            .cloned()
            .collect())
    }

    async fn find_permission(
        &self,
        _tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .find(|permission| permission.permission_id() == permission_id)
            .cloned())
    }

    async fn find_permission_by_code(
        &self,
        _tenant_id: TenantId,
        permission_code: &PermissionCode,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .find(|permission| permission.permission_code() == permission_code)
            .cloned())
    }

    async fn insert_permission(&self, _tenant_id: TenantId, permission: &Permission) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        if permissions
            .iter()
            .any(|stored| stored.permission_code() == permission.permission_code())
        {
            return Err(AppError::Conflict("permission code exists".to_owned()));
        }
        permissions.push(permission.clone());
        Ok(())
    }

    async fn save_permission(&self, _tenant_id: TenantId, permission: &Permission) -> AppResult<()> {
        let mut permissions = self.permissions.lock().await;
        if let Some(stored) = permissions
            .iter_mut()
            .find(|stored| stored.permission_id() == permission.permission_id())
        {
            *stored = permission.clone();
        }
        Ok(())
    }

    async fn delete_permission(
        &self,
        _tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        if self
            .grants
            .lock()
            .await
            .values()
            .any(|set| set.contains(permission_id))
        {
            return Err(AppError::Conflict("permission is granted".to_owned()));
        }
        self.permissions
            .lock()
            .await
            .retain(|permission| permission.permission_id() != permission_id);
        Ok(())
    }

    async fn list_role_permissions(
        &self,
        _tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>> {
        let grants = self.grants.lock().await;
        let Some(set) = grants.get(&role_id) else {
            return Ok(Vec::new());
        };
        Ok(self
            .permissions
            .lock()
            .await
            .iter()
            .filter(|permission| set.contains(permission.permission_id()))
            .cloned()
            .collect())
    }

    async fn grant_permission(
        &self,
        _tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        Ok(self
            .grants
            .lock()
            .await
            .entry(role_id)
            .or_insert_with(|| RolePermissionSet::empty(role_id))
            .grant(permission_id))
    }

    async fn revoke_permission(
        &self,
        _tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        Ok(self
            .grants
            .lock()
            .await
            .get_mut(&role_id)
            .map(|set| set.revoke(permission_id))
            .unwrap_or(MembershipChange::Unchanged))
    }

    async fn list_role_assignments(&self, _tenant_id: TenantId) -> AppResult<Vec<RoleAssignment>> {
        let roles = self.roles.lock().await;
        Ok(self
            .assignments
            .lock()
            .await
            .iter()
            .filter_map(|(subject, role_id)| {
                let role = roles.iter().find(|role| role.role_id() == *role_id)?;
                Some(RoleAssignment {
                    subject: subject.clone(),
                    role_id: *role_id,
                    role_code: role.role_code().clone(),
                    role_name: role.role_name().as_str().to_owned(),
                    assigned_at: chrono::Utc::now(),
                })
            })
            .collect())
    }

    async fn assign_role_to_subject(
        &self,
        _tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        let mut assignments = self.assignments.lock().await;
        let entry = (subject.to_owned(), role_id);
        if assignments.contains(&entry) {
            return Ok(MembershipChange::Unchanged);
        }
        assignments.push(entry);
        Ok(MembershipChange::Applied)
    }

    async fn remove_role_from_subject(
        &self,
        _tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        let mut assignments = self.assignments.lock().await;
        let before = assignments.len();
        assignments.retain(|(stored_subject, stored_role_id)| {
            !(stored_subject == subject && *stored_role_id == role_id)
        });
        Ok(MembershipChange::from_applied(assignments.len() != before))
    }
}

struct FakeAuditLogRepository;

#[async_trait]
impl AuditLogRepository for FakeAuditLogRepository {
    async fn list_recent_entries(
        &self,
        _tenant_id: TenantId,
        _query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

struct Fixture {
    service: SecurityAdminService,
    repository: Arc<FakeSecurityAdminRepository>,
    audit_repository: Arc<FakeAuditRepository>,
    actor: UserIdentity,
}

fn fixture(capabilities: &[AdminCapability]) -> Fixture {
    let tenant_id = TenantId::new();
    let actor = UserIdentity::new("kim", "Kim", tenant_id);
    let repository = Arc::new(FakeSecurityAdminRepository::default());
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let authorization_service = AuthorizationService::new(Arc::new(FakeAuthorizationRepository {
        codes: HashMap::from([(
            (tenant_id, "kim".to_owned()),
            capabilities
                .iter()
                .map(|capability| capability.code().to_owned())
                .collect(),
        )]),
    }));
    let service = SecurityAdminService::new(
        authorization_service,
        repository.clone(),
        Arc::new(FakeAuditLogRepository),
        audit_repository.clone(),
    );

    Fixture {
        service,
        repository,
        audit_repository,
        actor,
    }
}

fn admin_fixture() -> Fixture {
    fixture(AdminCapability::all())
}

fn role_draft(code: &str, name: &str) -> RoleDraft {
    RoleDraft {
        role_code: code.to_owned(),
        role_name: name.to_owned(),
        description: None,
    }
}

fn permission_draft(code: &str, module: PermissionModule) -> PermissionDraft {
    PermissionDraft {
        permission_code: code.to_owned(),
        permission_name: code.to_lowercase(),
        module,
        description: None,
    }
}

async fn seeded_role_and_permission(fixture: &Fixture) -> (Role, Permission) {
    let role = fixture
        .service
        .create_role(&fixture.actor, role_draft("QA_LEAD", "QA Lead"))
        .await
        .unwrap_or_else(|_| unreachable!());
    let permission = fixture
        .service
        .create_permission(
            &fixture.actor,
            permission_draft("QUALITY_INSPECT", PermissionModule::Quality),
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    (role, permission)
}

#[tokio::test]
async fn create_role_requires_role_manage() {
    let fixture = fixture(&[AdminCapability::PermissionManage]);

    let result = fixture
        .service
        .create_role(&fixture.actor, role_draft("QA_LEAD", "QA Lead"))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn create_role_writes_audit_event() {
    let fixture = admin_fixture();

    let result = fixture
        .service
        .create_role(&fixture.actor, role_draft("QA_LEAD", "QA Lead"))
        .await;

    assert!(result.is_ok());
    assert_eq!(fixture.audit_repository.events.lock().await.len(), 1);
}

#[tokio::test]
async fn duplicate_role_code_is_a_conflict() {
    let fixture = admin_fixture();
    let first = fixture
        .service
        .create_role(&fixture.actor, role_draft("QA_LEAD", "QA Lead"))
        .await;
    let second = fixture
        .service
        .create_role(&fixture.actor, role_draft("QA_LEAD", "Another"))
        .await;

    assert!(first.is_ok());
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_role_keeps_code() {
    let fixture = admin_fixture();
    let (role, _) = seeded_role_and_permission(&fixture).await;

    let updated = fixture
        .service
        .update_role(
            &fixture.actor,
            role.role_id(),
            UpdateRoleInput {
                role_name: "Quality Lead".to_owned(),
                description: Some("Leads inspections".to_owned()),
            },
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.role_code().as_str(), "QA_LEAD");
    assert_eq!(updated.role_name().as_str(), "Quality Lead");
}

#[tokio::test]
async fn assigning_twice_keeps_single_membership() {
    let fixture = admin_fixture();
    let (role, permission) = seeded_role_and_permission(&fixture).await;
    let events_before = fixture.audit_repository.events.lock().await.len();

    let first = fixture
        .service
        .assign_permission(&fixture.actor, role.role_id(), permission.permission_id())
        .await;
    let second = fixture
        .service
        .assign_permission(&fixture.actor, role.role_id(), permission.permission_id())
        .await;
    let listed = fixture
        .service
        .list_role_permissions(&fixture.actor, role.role_id())
        .await
        .unwrap_or_default();

    assert!(matches!(first, Ok(MembershipChange::Applied)));
    assert!(matches!(second, Ok(MembershipChange::Unchanged)));
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].permission_code().as_str(), "QUALITY_INSPECT");
    assert_eq!(
        fixture.audit_repository.events.lock().await.len(),
        events_before + 1
    );
}

#[tokio::test]
async fn removing_permission_empties_snapshot() {
    let fixture = admin_fixture();
    let (role, permission) = seeded_role_and_permission(&fixture).await;

    let assigned = fixture
        .service
        .assign_permission(&fixture.actor, role.role_id(), permission.permission_id())
        .await;
    let removed = fixture
        .service
        .remove_permission(&fixture.actor, role.role_id(), permission.permission_id())
        .await;
    let removed_again = fixture
        .service
        .remove_permission(&fixture.actor, role.role_id(), permission.permission_id())
        .await;
    let listed = fixture
        .service
        .list_role_permissions(&fixture.actor, role.role_id())
        .await;

    assert!(assigned.is_ok());
    assert!(matches!(removed, Ok(MembershipChange::Applied)));
    assert!(matches!(removed_again, Ok(MembershipChange::Unchanged)));
    assert!(matches!(listed, Ok(permissions) if permissions.is_empty()));
}

#[tokio::test]
async fn assigning_unknown_permission_is_not_found() {
    let fixture = admin_fixture();
    let (role, _) = seeded_role_and_permission(&fixture).await;

    let result = fixture
        .service
        .assign_permission(&fixture.actor, role.role_id(), PermissionId::new())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn status_changes_are_idempotent() {
    let fixture = admin_fixture();
    let (role, _) = seeded_role_and_permission(&fixture).await;
    let events_before = fixture.audit_repository.events.lock().await.len();

    let activated = fixture
        .service
        .set_role_status(&fixture.actor, role.role_id(), RoleStatus::Active)
        .await;
    let deactivated = fixture
        .service
        .set_role_status(&fixture.actor, role.role_id(), RoleStatus::Inactive)
        .await;
    let deactivated_again = fixture
        .service
        .set_role_status(&fixture.actor, role.role_id(), RoleStatus::Inactive)
        .await;
    let toggled = fixture
        .service
        .toggle_role_status(&fixture.actor, role.role_id())
        .await;

    assert!(matches!(activated, Ok(role) if role.status() == RoleStatus::Active));
    assert!(matches!(deactivated, Ok(role) if role.status() == RoleStatus::Inactive));
    assert!(matches!(deactivated_again, Ok(role) if role.status() == RoleStatus::Inactive));
    assert!(matches!(toggled, Ok(role) if role.status() == RoleStatus::Active));
    assert_eq!(
        fixture.audit_repository.events.lock().await.len(),
        events_before + 2
    );
}

#[tokio::test]
async fn deleting_assigned_role_is_a_conflict() {
    let fixture = admin_fixture();
    let (role, _) = seeded_role_and_permission(&fixture).await;
    let assigned = fixture
        .service
        .assign_role(&fixture.actor, "lee", role.role_id())
        .await;

    let deleted = fixture
        .service
        .delete_role(&fixture.actor, role.role_id())
        .await;
    let still_there = fixture
        .service
        .get_role(&fixture.actor, role.role_id())
        .await;

    assert!(assigned.is_ok());
    assert!(matches!(deleted, Err(AppError::Conflict(_))));
    assert!(still_there.is_ok());
}

#[tokio::test]
async fn deleting_unassigned_role_removes_it() {
    let fixture = admin_fixture();
    let (role, _) = seeded_role_and_permission(&fixture).await;

    let deleted = fixture
        .service
        .delete_role(&fixture.actor, role.role_id())
        .await;
    let lookup = fixture
        .service
        .get_role(&fixture.actor, role.role_id())
        .await;

    assert!(deleted.is_ok());
    assert!(matches!(lookup, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn role_managers_can_read_the_permission_catalog() {
    let fixture = fixture(&[AdminCapability::RoleManage]);

    let listed = fixture
        .service
        .list_permissions(&fixture.actor, PermissionListQuery::default())
        .await;
    let created = fixture
        .service
        .create_permission(
            &fixture.actor,
            permission_draft("QUALITY_INSPECT", PermissionModule::Quality),
        )
        .await;

    assert!(listed.is_ok());
    assert!(matches!(created, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn list_audit_log_requires_audit_permission() {
    let fixture = fixture(&[AdminCapability::RoleManage]);

    let result = fixture
        .service
        .list_audit_log(&fixture.actor, AuditLogQuery::default())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn list_roles_page_reports_total() {
    let fixture = admin_fixture();
    for code in ["AAA_ROLE", "BBB_ROLE", "CCC_ROLE"] {
        let created = fixture
            .service
            .create_role(&fixture.actor, role_draft(code, code))
            .await;
        assert!(created.is_ok());
    }

    let page = fixture
        .service
        .list_roles_page(
            &fixture.actor,
            RoleListQuery::default(),
            PageRequest::new(1, Some(2)).unwrap_or_else(|_| unreachable!()),
        )
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(page.total_elements, 3);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].role_code().as_str(), "CCC_ROLE");
}

#[tokio::test]
async fn bootstrap_administrator_seeds_first_administrator_once() {
    let fixture = fixture(&[]);
    let tenant_id = fixture.actor.tenant_id();

    let first = fixture
        .service
        .bootstrap_administrator(tenant_id, "kim")
        .await;
    let second = fixture
        .service
        .bootstrap_administrator(tenant_id, "kim")
        .await;

    assert!(
        matches!(&first, Ok(Some(role)) if role.role_code().as_str() == SYSTEM_ADMIN_ROLE_CODE)
    );
    assert!(matches!(second, Ok(None)));
    assert_eq!(fixture.repository.roles.lock().await.len(), 1);
    assert_eq!(
        fixture.repository.permissions.lock().await.len(),
        AdminCapability::all().len()
    );
    assert_eq!(fixture.repository.assignments.lock().await.len(), 1);

    let role_id = first
        .ok()
        .flatten()
        .map(|role| role.role_id())
        .unwrap_or_default();
    let granted = fixture
        .repository
        .grants
        .lock()
        .await
        .get(&role_id)
        .map(RolePermissionSet::len)
        .unwrap_or_default();
    assert_eq!(granted, AdminCapability::all().len());
}

#[tokio::test]
async fn bootstrap_administrator_leaves_later_subjects_unassigned() {
    let fixture = fixture(&[]);
    let tenant_id = fixture.actor.tenant_id();

    let first = fixture
        .service
        .bootstrap_administrator(tenant_id, "kim")
        .await
        .unwrap_or_else(|_| unreachable!());
    let later = fixture
        .service
        .bootstrap_administrator(tenant_id, "lee")
        .await;

    assert!(first.is_some());
    assert!(matches!(later, Ok(None)));
    let assignments = fixture.repository.assignments.lock().await;
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].0, "kim");
}

#[tokio::test]
async fn bootstrap_administrator_reseeds_when_no_holder_remains() {
    let fixture = fixture(&[]);
    let tenant_id = fixture.actor.tenant_id();

    let role = fixture
        .service
        .bootstrap_administrator(tenant_id, "kim")
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| unreachable!());
    let removed = fixture
        .repository
        .remove_role_from_subject(tenant_id, "kim", role.role_id())
        .await;
    assert!(matches!(removed, Ok(MembershipChange::Applied)));

    let reseeded = fixture
        .service
        .bootstrap_administrator(tenant_id, "lee")
        .await;

    assert!(matches!(reseeded, Ok(Some(ref seeded)) if seeded.role_id() == role.role_id()));
    assert_eq!(fixture.repository.roles.lock().await.len(), 1);
}

#[tokio::test]
async fn bootstrap_administrator_completes_an_interrupted_seed() {
    let fixture = fixture(&[]);
    let tenant_id = fixture.actor.tenant_id();
    let mut stale = Permission::new(AdminCapability::all()[0].seed_draft())
        .unwrap_or_else(|_| unreachable!());
    assert!(stale.set_status(PermissionStatus::Inactive));
    let role = Role::new(role_draft(SYSTEM_ADMIN_ROLE_CODE, "System Administrator"))
        .unwrap_or_else(|_| unreachable!());
    assert!(fixture.repository.insert_permission(tenant_id, &stale).await.is_ok());
    assert!(fixture.repository.insert_role(tenant_id, &role).await.is_ok());

    let seeded = fixture
        .service
        .bootstrap_administrator(tenant_id, "kim")
        .await;

    assert!(matches!(seeded, Ok(Some(ref seeded)) if seeded.role_id() == role.role_id()));
    let permissions = fixture.repository.permissions.lock().await;
    assert_eq!(permissions.len(), AdminCapability::all().len());
    assert!(permissions.iter().all(Permission::is_active));
    let granted = fixture
        .repository
        .grants
        .lock()
        .await
        .get(&role.role_id())
        .map(RolePermissionSet::len)
        .unwrap_or_default();
    assert_eq!(granted, AdminCapability::all().len());
}

#[tokio::test]
async fn system_admin_role_cannot_be_deleted_or_deactivated() {
    let fixture = admin_fixture();
    let role = fixture
        .service
        .bootstrap_administrator(fixture.actor.tenant_id(), "lee")
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| unreachable!());

    let deleted = fixture
        .service
        .delete_role(&fixture.actor, role.role_id())
        .await;
    let deactivated = fixture
        .service
        .set_role_status(&fixture.actor, role.role_id(), RoleStatus::Inactive)
        .await;

    assert!(matches!(deleted, Err(AppError::Conflict(_))));
    assert!(matches!(deactivated, Err(AppError::Conflict(_))));
}
