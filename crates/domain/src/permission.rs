use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mes_core::{AppError, AppResult, NonEmptyString, optional_text};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::validate_code;
use crate::role::{DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH};

/// Stable permission identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(Uuid);

impl PermissionId {
    /// Creates a random permission identifier.
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

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for PermissionId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self).map_err(|error| {
            AppError::Validation(format!("invalid permission id '{value}': {error}"))
        })
    }
}

/// Unique, immutable upper-snake-case permission code such as `USER_CREATE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionCode(String);

impl PermissionCode {
    /// Validates a permission code.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        validate_code(value, "permissionCode").map(Self)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PermissionCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionCode> for String {
    fn from(value: PermissionCode) -> Self {
        value.0
    }
}

impl Display for PermissionCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Fixed business module used to group permissions for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionModule {
    /// Production orders, work orders and POP.
    Production,
    /// Stock levels and movements.
    Inventory,
    /// Inspections and defects.
    Quality,
    /// Purchase orders and suppliers.
    Purchasing,
    /// Sales orders and shipments.
    Sales,
    /// Locations, receiving and picking.
    Warehouse,
    /// Machines and maintenance.
    Equipment,
    /// Users, roles and permissions.
    System,
}

impl PermissionModule {
    /// Returns the stable storage and transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "PRODUCTION",
            Self::Inventory => "INVENTORY",
            Self::Quality => "QUALITY",
            Self::Purchasing => "PURCHASING",
            Self::Sales => "SALES",
            Self::Warehouse => "WAREHOUSE",
            Self::Equipment => "EQUIPMENT",
            Self::System => "SYSTEM",
        }
    }

    /// Returns the label shown above a checklist group.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Production => "Production Management",
            Self::Inventory => "Inventory Management",
            Self::Quality => "Quality Management",
            Self::Purchasing => "Purchasing Management",
            Self::Sales => "Sales Management",
            Self::Warehouse => "Warehouse Management",
            Self::Equipment => "Equipment Management",
            Self::System => "System Administration",
        }
    }

    /// Returns all modules in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionModule] = &[
            PermissionModule::Production,
            PermissionModule::Inventory,
            PermissionModule::Quality,
            PermissionModule::Purchasing,
            PermissionModule::Sales,
            PermissionModule::Warehouse,
            PermissionModule::Equipment,
            PermissionModule::System,
        ];

        ALL
    }
}

impl FromStr for PermissionModule {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|module| module.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| AppError::Validation(format!("unknown permission module '{value}'")))
    }
}

/// Permission lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Permission takes effect through roles.
    Active,
    /// Permission is kept but grants nothing.
    Inactive,
}

impl PermissionStatus {
    /// Returns the stable storage and transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
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

impl FromStr for PermissionStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown permission status '{value}'"
            ))),
        }
    }
}

/// Unvalidated permission creation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDraft {
    /// Requested permission code.
    pub permission_code: String,
    /// Requested display name.
    pub permission_name: String,
    /// Owning business module.
    pub module: PermissionModule,
    /// Optional description.
    pub description: Option<String>,
}

/// Atomic named capability that a role may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    permission_id: PermissionId,
    permission_code: PermissionCode,
    permission_name: NonEmptyString,
    module: PermissionModule,
    description: Option<String>,
    status: PermissionStatus,
    created_at: DateTime<Utc>,
}

impl Permission {
    /// Creates a new active permission from validated draft input.
    pub fn new(draft: PermissionDraft) -> AppResult<Self> {
        Ok(Self {
            permission_id: PermissionId::new(),
            permission_code: PermissionCode::new(draft.permission_code)?,
            permission_name: NonEmptyString::bounded(
                draft.permission_name,
                "permissionName",
                NAME_MAX_LENGTH,
            )?,
            module: draft.module,
            description: optional_text(draft.description, "description", DESCRIPTION_MAX_LENGTH)?,
            status: PermissionStatus::Active,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a permission from persisted state.
    #[must_use]
    pub fn restore(
        permission_id: PermissionId,
        permission_code: PermissionCode,
        permission_name: NonEmptyString,
        module: PermissionModule,
        description: Option<String>,
        status: PermissionStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            permission_id,
            permission_code,
            permission_name,
            module,
            description,
            status,
            created_at,
        }
    }

    /// Returns the stable identifier.
    #[must_use]
    pub fn permission_id(&self) -> PermissionId {
        self.permission_id
    }

    /// Returns the immutable permission code.
    #[must_use]
    pub fn permission_code(&self) -> &PermissionCode {
        &self.permission_code
    }

    /// Returns the display name.
    #[must_use]
    pub fn permission_name(&self) -> &NonEmptyString {
        &self.permission_name
    }

    /// Returns the owning module.
    #[must_use]
    pub fn module(&self) -> PermissionModule {
        self.module
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> PermissionStatus {
        self.status
    }

    /// Returns whether the permission currently takes effect.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PermissionStatus::Active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces name, module and description. The permission code never changes.
    pub fn update_details(
        &mut self,
        permission_name: impl Into<String>,
        module: PermissionModule,
        description: Option<String>,
    ) -> AppResult<()> {
        let permission_name =
            NonEmptyString::bounded(permission_name, "permissionName", NAME_MAX_LENGTH)?;
        let description = optional_text(description, "description", DESCRIPTION_MAX_LENGTH)?;
        self.permission_name = permission_name;
        self.module = module;
        self.description = description;
        Ok(())
    }

    /// Sets the status and reports whether it changed.
    pub fn set_status(&mut self, status: PermissionStatus) -> bool {
        let changed = self.status != status;
        self.status = status;
        changed
    }
}
