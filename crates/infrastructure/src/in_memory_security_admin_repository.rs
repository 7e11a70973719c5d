use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use mes_application::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
    AuthorizationRepository, PermissionListQuery, RoleAssignment, RoleListQuery,
    SecurityAdminRepository,
};
use mes_core::{AppError, AppResult, TenantId};
use mes_domain::{
    MembershipChange, Permission, PermissionCode, PermissionId, Role, RoleCode, RoleId,
    RolePermissionSet,
};

#[cfg(test)]
mod tests;

/// In-memory security administration store.
///
/// Implements every security port so a single instance can back the whole API
/// without a database. Locks are always taken in field order.
#[derive(Debug, Default)]
pub struct InMemorySecurityAdminRepository {
    roles: RwLock<HashMap<(TenantId, RoleId), Role>>,
    permissions: RwLock<HashMap<(TenantId, PermissionId), Permission>>,
    grants: RwLock<HashMap<(TenantId, RoleId), RolePermissionSet>>,
    subject_roles: RwLock<HashMap<(TenantId, String), BTreeMap<RoleId, DateTime<Utc>>>>,
    audit_entries: RwLock<Vec<(TenantId, AuditLogEntry)>>,
}

impl InMemorySecurityAdminRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn role_not_found(role_id: RoleId) -> AppError {
    AppError::NotFound(format!("role '{role_id}' was not found"))
}

fn sorted_by<T, K: Ord>(mut values: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    values.sort_by_key(|value| key(value));
    values
}

#[async_trait]
impl SecurityAdminRepository for InMemorySecurityAdminRepository {
    async fn list_roles(&self, tenant_id: TenantId, query: &RoleListQuery) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;
        let values = roles
            .iter()
            .filter_map(|((stored_tenant_id, _), role)| {
                (stored_tenant_id == &tenant_id && query.matches(role)).then(|| role.clone())
            })
            .collect();

        Ok(sorted_by(values, |role: &Role| role.role_code().clone()))
    }

    async fn find_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(&(tenant_id, role_id)).cloned())
    }

    async fn find_role_by_code(
        &self,
        tenant_id: TenantId,
        role_code: &RoleCode,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .iter()
            .find(|((stored_tenant_id, _), role)| {
                stored_tenant_id == &tenant_id && role.role_code() == role_code
            })
            .map(|(_, role)| role.clone()))
    }

    async fn insert_role(&self, tenant_id: TenantId, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        if roles.iter().any(|((stored_tenant_id, _), stored)| {
            stored_tenant_id == &tenant_id && stored.role_code() == role.role_code()
        }) {
            return Err(AppError::Conflict(format!(
                "role code '{}' already exists",
                role.role_code()
            )));
        }

        roles.insert((tenant_id, role.role_id()), role.clone());
        Ok(())
    }

    async fn save_role(&self, tenant_id: TenantId, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let Some(stored) = roles.get_mut(&(tenant_id, role.role_id())) else {
            return Err(role_not_found(role.role_id()));
        };

        *stored = role.clone();
        Ok(())
    }

    async fn delete_role(&self, tenant_id: TenantId, role_id: RoleId) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        let mut grants = self.grants.write().await;
        let subject_roles = self.subject_roles.read().await;

        let holders = subject_roles
            .iter()
            .filter(|((stored_tenant_id, _), role_ids)| {
                stored_tenant_id == &tenant_id && role_ids.contains_key(&role_id)
            })
            .count();
        if holders > 0 {
            return Err(AppError::Conflict(format!(
                "role '{role_id}' is still assigned to {holders} subject(s)"
            )));
        }

        if roles.remove(&(tenant_id, role_id)).is_none() {
            return Err(role_not_found(role_id));
        }
        grants.remove(&(tenant_id, role_id));
        Ok(())
    }

    async fn list_permissions(
        &self,
        tenant_id: TenantId,
        query: &PermissionListQuery,
    ) -> AppResult<Vec<Permission>> {
        let permissions = self.permissions.read().await;
        let values = permissions
            .iter()
            .filter_map(|((stored_tenant_id, _), permission)| {
                (stored_tenant_id == &tenant_id && query.matches(permission))
                    .then(|| permission.clone())
            })
            .collect();

        Ok(sorted_by(values, |permission: &Permission| {
            permission.permission_code().clone()
        }))
    }

    async fn find_permission(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .permissions
            .read()
            .await
            .get(&(tenant_id, permission_id))
            .cloned())
    }

    async fn find_permission_by_code(
        &self,
        tenant_id: TenantId,
        permission_code: &PermissionCode,
    ) -> AppResult<Option<Permission>> {
        Ok(self
            .permissions
            .read()
            .await
            .iter()
            .find(|((stored_tenant_id, _), permission)| {
                stored_tenant_id == &tenant_id && permission.permission_code() == permission_code
            })
            .map(|(_, permission)| permission.clone()))
    }

    async fn insert_permission(&self, tenant_id: TenantId, permission: &Permission) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        if permissions.iter().any(|((stored_tenant_id, _), stored)| {
            stored_tenant_id == &tenant_id && stored.permission_code() == permission.permission_code()
        }) {
            return Err(AppError::Conflict(format!(
                "permission code '{}' already exists",
                permission.permission_code()
            )));
        }

        permissions.insert((tenant_id, permission.permission_id()), permission.clone());
        Ok(())
    }

    async fn save_permission(&self, tenant_id: TenantId, permission: &Permission) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        let Some(stored) = permissions.get_mut(&(tenant_id, permission.permission_id())) else {
            return Err(AppError::NotFound(format!(
                "permission '{}' was not found",
                permission.permission_id()
            )));
        };

        *stored = permission.clone();
        Ok(())
    }

    async fn delete_permission(
        &self,
        tenant_id: TenantId,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        let grants = self.grants.read().await;

        let holders = grants
            .iter()
            .filter(|((stored_tenant_id, _), set)| {
                stored_tenant_id == &tenant_id && set.contains(permission_id)
            })
            .count();
        if holders > 0 {
            return Err(AppError::Conflict(format!(
                "permission '{permission_id}' is still granted to {holders} role(s)"
            )));
        }

        if permissions.remove(&(tenant_id, permission_id)).is_none() {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }
        Ok(())
    }

    async fn list_role_permissions(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
    ) -> AppResult<Vec<Permission>> {
        let permissions = self.permissions.read().await;
        let grants = self.grants.read().await;
        let Some(set) = grants.get(&(tenant_id, role_id)) else {
            return Ok(Vec::new());
        };

        let values = set
            .iter()
            .filter_map(|permission_id| permissions.get(&(tenant_id, permission_id)).cloned())
            .collect();

        Ok(sorted_by(values, |permission: &Permission| {
            permission.permission_code().clone()
        }))
    }

    async fn grant_permission(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        let roles = self.roles.read().await;
        let permissions = self.permissions.read().await;
        let mut grants = self.grants.write().await;
        if !roles.contains_key(&(tenant_id, role_id)) {
            return Err(role_not_found(role_id));
        }
        if !permissions.contains_key(&(tenant_id, permission_id)) {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' was not found"
            )));
        }

        Ok(grants
            .entry((tenant_id, role_id))
            .or_insert_with(|| RolePermissionSet::empty(role_id))
            .grant(permission_id))
    }

    async fn revoke_permission(
        &self,
        tenant_id: TenantId,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<MembershipChange> {
        Ok(self
            .grants
            .write()
            .await
            .get_mut(&(tenant_id, role_id))
            .map_or(MembershipChange::Unchanged, |set| set.revoke(permission_id)))
    }

    async fn list_role_assignments(&self, tenant_id: TenantId) -> AppResult<Vec<RoleAssignment>> {
        let roles = self.roles.read().await;
        let subject_roles = self.subject_roles.read().await;

        let mut assignments = Vec::new();
        for ((stored_tenant_id, subject), role_ids) in subject_roles.iter() {
            if stored_tenant_id != &tenant_id {
                continue;
            }

            for (role_id, assigned_at) in role_ids {
                let Some(role) = roles.get(&(tenant_id, *role_id)) else {
                    continue;
                };
                assignments.push(RoleAssignment {
                    subject: subject.clone(),
                    role_id: *role_id,
                    role_code: role.role_code().clone(),
                    role_name: role.role_name().as_str().to_owned(),
                    assigned_at: *assigned_at,
                });
            }
        }

        assignments.sort_by(|left, right| {
            left.subject
                .cmp(&right.subject)
                .then_with(|| left.role_code.cmp(&right.role_code))
        });
        Ok(assignments)
    }

    async fn assign_role_to_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        let roles = self.roles.read().await;
        let mut subject_roles = self.subject_roles.write().await;
        if !roles.contains_key(&(tenant_id, role_id)) {
            return Err(role_not_found(role_id));
        }

        let role_ids = subject_roles
            .entry((tenant_id, subject.to_owned()))
            .or_default();
        if role_ids.contains_key(&role_id) {
            return Ok(MembershipChange::Unchanged);
        }

        role_ids.insert(role_id, Utc::now());
        Ok(MembershipChange::Applied)
    }

    async fn remove_role_from_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        let mut subject_roles = self.subject_roles.write().await;
        let key = (tenant_id, subject.to_owned());
        let Some(role_ids) = subject_roles.get_mut(&key) else {
            return Ok(MembershipChange::Unchanged);
        };

        let removed = role_ids.remove(&role_id).is_some();
        if role_ids.is_empty() {
            subject_roles.remove(&key);
        }
        Ok(MembershipChange::from_applied(removed))
    }
}

#[async_trait]
impl AuthorizationRepository for InMemorySecurityAdminRepository {
    async fn list_permission_codes_for_subject(
        &self,
        tenant_id: TenantId,
        subject: &str,
    ) -> AppResult<Vec<String>> {
        let roles = self.roles.read().await;
        let permissions = self.permissions.read().await;
        let grants = self.grants.read().await;
        let subject_roles = self.subject_roles.read().await;

        let Some(role_ids) = subject_roles.get(&(tenant_id, subject.to_owned())) else {
            return Ok(Vec::new());
        };

        let mut codes: Vec<String> = role_ids
            .keys()
            .filter(|role_id| {
                roles
                    .get(&(tenant_id, **role_id))
                    .is_some_and(Role::is_active)
            })
            .filter_map(|role_id| grants.get(&(tenant_id, *role_id)))
            .flat_map(RolePermissionSet::iter)
            .filter_map(|permission_id| permissions.get(&(tenant_id, permission_id)))
            .filter(|permission| permission.is_active())
            .map(|permission| permission.permission_code().as_str().to_owned())
            .collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }
}

#[async_trait]
impl AuditRepository for InMemorySecurityAdminRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let tenant_id = event.tenant_id;
        let entry = AuditLogEntry::recorded(Uuid::new_v4().to_string(), event, Utc::now());
        self.audit_entries.write().await.push((tenant_id, entry));
        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemorySecurityAdminRepository {
    async fn list_recent_entries(
        &self,
        tenant_id: TenantId,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.audit_entries.read().await;

        Ok(entries
            .iter()
            .rev()
            .filter(|(stored_tenant_id, entry)| {
                stored_tenant_id == &tenant_id && query.matches(entry)
            })
            .skip(query.offset)
            .take(query.limit)
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}
