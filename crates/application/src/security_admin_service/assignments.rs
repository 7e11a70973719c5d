use mes_core::NonEmptyString;
use mes_domain::MembershipChange;

use super::*;

use crate::security_admin_ports::RoleAssignment;

impl SecurityAdminService {
    /// Returns subject role assignments for administrative users.
    pub async fn list_role_assignments(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.require(actor, AdminCapability::RoleManage).await?;

        self.repository
            .list_role_assignments(actor.tenant_id())
            .await
    }

    /// Assigns a role to a subject and emits an audit event.
    pub async fn assign_role(
        &self,
        actor: &UserIdentity,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let subject = NonEmptyString::new(subject)?;
        let role = self.load_role(actor.tenant_id(), role_id).await?;
        let change = self
            .repository
            .assign_role_to_subject(actor.tenant_id(), subject.as_str(), role_id)
            .await?;

        if change.is_applied() {
            self.append_audit(
                actor.tenant_id(),
                actor.subject(),
                AuditAction::RoleAssigned,
                "mes_subject_role",
                format!("{subject}:{role_id}"),
                format!("assigned role '{}' to '{subject}'", role.role_code()),
            )
            .await?;
        }

        Ok(change)
    }

    /// Removes a role from a subject and emits an audit event.
    pub async fn unassign_role(
        &self,
        actor: &UserIdentity,
        subject: &str,
        role_id: RoleId,
    ) -> AppResult<MembershipChange> {
        self.require(actor, AdminCapability::RoleManage).await?;

        let role = self.load_role(actor.tenant_id(), role_id).await?;
        let change = self
            .repository
            .remove_role_from_subject(actor.tenant_id(), subject, role_id)
            .await?;

        if change.is_applied() {
            self.append_audit(
                actor.tenant_id(),
                actor.subject(),
                AuditAction::RoleUnassigned,
                "mes_subject_role",
                format!("{subject}:{role_id}"),
                format!("removed role '{}' from '{subject}'", role.role_code()),
            )
            .await?;
        }

        Ok(change)
    }
}
