use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mes_core::{AppError, AppResult, NonEmptyString, optional_text};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::validate_code;

/// Longest accepted role or permission display name.
pub const NAME_MAX_LENGTH: usize = 100;

/// Longest accepted role or permission description.
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

/// Stable role identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid role id '{value}': {error}")))
    }
}

/// Unique, immutable upper-snake-case role code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleCode(String);

impl RoleCode {
    /// Validates a role code.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        validate_code(value, "roleCode").map(Self)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for RoleCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleCode> for String {
    fn from(value: RoleCode) -> Self {
        value.0
    }
}

impl Display for RoleCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Role lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleStatus {
    /// Role grants take effect.
    Active,
    /// Role is kept but grants nothing.
    Inactive,
}

impl RoleStatus {
    /// Returns the stable storage and transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }

    /// Returns the opposite status.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }
}

impl FromStr for RoleStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown role status '{value}'"
            ))),
        }
    }
}

/// Unvalidated role creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    /// Requested role code.
    pub role_code: String,
    /// Requested display name.
    pub role_name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// A named bundle of permissions assignable to subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    role_id: RoleId,
    role_code: RoleCode,
    role_name: NonEmptyString,
    description: Option<String>,
    status: RoleStatus,
    created_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new active role from validated draft input.
    pub fn new(draft: RoleDraft) -> AppResult<Self> {
        Ok(Self {
            role_id: RoleId::new(),
            role_code: RoleCode::new(draft.role_code)?,
            role_name: NonEmptyString::bounded(draft.role_name, "roleName", NAME_MAX_LENGTH)?,
            description: optional_text(draft.description, "description", DESCRIPTION_MAX_LENGTH)?,
            status: RoleStatus::Active,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a role from persisted state.
    #[must_use]
    pub fn restore(
        role_id: RoleId,
        role_code: RoleCode,
        role_name: NonEmptyString,
        description: Option<String>,
        status: RoleStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            role_id,
            role_code,
            role_name,
            description,
            status,
            created_at,
        }
    }

    /// Returns the stable identifier.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the immutable role code.
    #[must_use]
    pub fn role_code(&self) -> &RoleCode {
        &self.role_code
    }

    /// Returns the display name.
    #[must_use]
    pub fn role_name(&self) -> &NonEmptyString {
        &self.role_name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> RoleStatus {
        self.status
    }

    /// Returns whether role grants currently take effect.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == RoleStatus::Active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces name and description. The role code never changes.
    pub fn update_details(
        &mut self,
        role_name: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<()> {
        let role_name = NonEmptyString::bounded(role_name, "roleName", NAME_MAX_LENGTH)?;
        let description = optional_text(description, "description", DESCRIPTION_MAX_LENGTH)?;
        self.role_name = role_name;
        self.description = description;
        Ok(())
    }

    /// Sets the status and reports whether it changed.
    pub fn set_status(&mut self, status: RoleStatus) -> bool {
        let changed = self.status != status;
        self.status = status;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, RoleCode, RoleDraft, RoleStatus};

    fn draft(code: &str, name: &str) -> RoleDraft {
        RoleDraft {
            role_code: code.to_owned(),
            role_name: name.to_owned(),
            description: None,
        }
    }

    #[test]
    fn new_role_starts_active() {
        let role = Role::new(draft("QA_LEAD", "QA Lead")).unwrap_or_else(|_| unreachable!());
        assert_eq!(role.role_code().as_str(), "QA_LEAD");
        assert_eq!(role.status(), RoleStatus::Active);
    }

    #[test]
    fn new_role_rejects_lowercase_code() {
        assert!(Role::new(draft("qa_lead", "QA Lead")).is_err());
    }

    #[test]
    fn new_role_rejects_blank_name() {
        assert!(Role::new(draft("QA_LEAD", "  ")).is_err());
    }

    #[test]
    fn update_details_keeps_code_and_normalizes_description() {
        let mut role = Role::new(draft("QA_LEAD", "QA Lead")).unwrap_or_else(|_| unreachable!());
        let result = role.update_details("Quality Lead", Some("   ".to_owned()));

        assert!(result.is_ok());
        assert_eq!(role.role_code().as_str(), "QA_LEAD");
        assert_eq!(role.role_name().as_str(), "Quality Lead");
        assert_eq!(role.description(), None);
    }

    #[test]
    fn failed_update_leaves_role_untouched() {
        let mut role = Role::new(draft("QA_LEAD", "QA Lead")).unwrap_or_else(|_| unreachable!());
        let result = role.update_details("", Some("ignored".to_owned()));

        assert!(result.is_err());
        assert_eq!(role.role_name().as_str(), "QA Lead");
    }

    #[test]
    fn set_status_is_idempotent() {
        let mut role = Role::new(draft("QA_LEAD", "QA Lead")).unwrap_or_else(|_| unreachable!());
        assert!(!role.set_status(RoleStatus::Active));
        assert!(role.set_status(RoleStatus::Inactive));
        assert!(!role.set_status(RoleStatus::Inactive));
        assert_eq!(role.status().toggled(), RoleStatus::Active);
    }

    #[test]
    fn role_code_deserialization_validates() {
        let parsed = serde_json::from_str::<RoleCode>("\"not valid\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn role_status_uses_uppercase_wire_values() {
        let encoded = serde_json::to_string(&RoleStatus::Inactive).unwrap_or_default();
        assert_eq!(encoded, "\"INACTIVE\"");
    }
}
