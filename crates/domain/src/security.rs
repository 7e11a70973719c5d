use std::str::FromStr;

use mes_core::AppError;
use serde::{Deserialize, Serialize};

use crate::permission::{PermissionDraft, PermissionModule};

/// Code of the built-in role granted to bootstrapped administrators.
pub const SYSTEM_ADMIN_ROLE_CODE: &str = "SYSTEM_ADMIN";

/// Built-in permissions enforced by the administration API itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminCapability {
    /// Manage roles, role grants and role assignments.
    RoleManage,
    /// Manage the permission catalog.
    PermissionManage,
    /// Read the administrative audit log.
    AuditRead,
}

impl AdminCapability {
    /// Returns the permission code backing this capability.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoleManage => "ROLE_MANAGE",
            Self::PermissionManage => "PERMISSION_MANAGE",
            Self::AuditRead => "AUDIT_READ",
        }
    }

    /// Returns all built-in capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AdminCapability] = &[
            AdminCapability::RoleManage,
            AdminCapability::PermissionManage,
            AdminCapability::AuditRead,
        ];

        ALL
    }

    /// Returns the catalog entry seeded for this capability.
    #[must_use]
    pub fn seed_draft(&self) -> PermissionDraft {
        let (name, description) = match self {
            Self::RoleManage => ("Manage roles", "Create roles and edit their permissions"),
            Self::PermissionManage => ("Manage permissions", "Maintain the permission catalog"),
            Self::AuditRead => ("Read audit log", "View administrative audit entries"),
        };

        PermissionDraft {
            permission_code: self.code().to_owned(),
            permission_name: name.to_owned(),
            module: PermissionModule::System,
            description: Some(description.to_owned()),
        }
    }
}

/// Stable audit actions emitted by administration use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A role was created.
    RoleCreated,
    /// A role's name or description changed.
    RoleUpdated,
    /// A role was deleted.
    RoleDeleted,
    /// A role was activated or deactivated.
    RoleStatusChanged,
    /// A permission was created.
    PermissionCreated,
    /// A permission's details changed.
    PermissionUpdated,
    /// A permission was deleted.
    PermissionDeleted,
    /// A permission was activated or deactivated.
    PermissionStatusChanged,
    /// A permission was granted to a role.
    RolePermissionAssigned,
    /// A permission was revoked from a role.
    RolePermissionRemoved,
    /// A role was assigned to a subject.
    RoleAssigned,
    /// A role was removed from a subject.
    RoleUnassigned,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleCreated => "security.role.created",
            Self::RoleUpdated => "security.role.updated",
            Self::RoleDeleted => "security.role.deleted",
            Self::RoleStatusChanged => "security.role.status_changed",
            Self::PermissionCreated => "security.permission.created",
            Self::PermissionUpdated => "security.permission.updated",
            Self::PermissionDeleted => "security.permission.deleted",
            Self::PermissionStatusChanged => "security.permission.status_changed",
            Self::RolePermissionAssigned => "security.role_permission.assigned",
            Self::RolePermissionRemoved => "security.role_permission.removed",
            Self::RoleAssigned => "security.role.assigned",
            Self::RoleUnassigned => "security.role.unassigned",
        }
    }

    /// Returns all actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AuditAction] = &[
            AuditAction::RoleCreated,
            AuditAction::RoleUpdated,
            AuditAction::RoleDeleted,
            AuditAction::RoleStatusChanged,
            AuditAction::PermissionCreated,
            AuditAction::PermissionUpdated,
            AuditAction::PermissionDeleted,
            AuditAction::PermissionStatusChanged,
            AuditAction::RolePermissionAssigned,
            AuditAction::RolePermissionRemoved,
            AuditAction::RoleAssigned,
            AuditAction::RoleUnassigned,
        ];

        ALL
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown audit action '{value}'")))
    }
}
