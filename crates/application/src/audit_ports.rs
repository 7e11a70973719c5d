use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mes_core::{AppResult, TenantId};
use mes_domain::AuditAction;

/// Security mutation recorded after it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Tenant the mutation happened in.
    pub tenant_id: TenantId,
    /// Acting subject.
    pub subject: String,
    /// What happened.
    pub action: AuditAction,
    /// Kind of the touched record, e.g. `mes_role`.
    pub resource_type: String,
    /// Code or id of the touched record.
    pub resource_id: String,
    /// Free-form context such as the granted permission code.
    pub detail: Option<String>,
}

/// Append-only sink for audit events.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Records one event.
    async fn append_event(&self, event: AuditEvent) -> AppResult<()>;
}

/// Stored audit event as shown to administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogEntry {
    /// Identifier assigned on append.
    pub event_id: String,
    /// Acting subject.
    pub subject: String,
    /// Action name, e.g. `security.role.created`.
    pub action: String,
    /// Kind of the touched record.
    pub resource_type: String,
    /// Code or id of the touched record.
    pub resource_id: String,
    /// Free-form context.
    pub detail: Option<String>,
    /// Append time.
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Materializes an event as stored at `created_at`.
    #[must_use]
    pub fn recorded(event_id: String, event: AuditEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            event_id,
            subject: event.subject,
            action: event.action.as_str().to_owned(),
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            detail: event.detail,
            created_at,
        }
    }
}

/// Rows served per audit page unless the caller asks otherwise.
pub const DEFAULT_AUDIT_PAGE_SIZE: usize = 50;

/// Audit log window and filters. Both filters match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Page size.
    pub limit: usize,
    /// Newest rows to skip.
    pub offset: usize,
    /// Only this action.
    pub action: Option<String>,
    /// Only this acting subject.
    pub subject: Option<String>,
}

impl AuditLogQuery {
    /// Returns whether an entry passes both filters.
    #[must_use]
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        self.action
            .as_deref()
            .is_none_or(|action| entry.action == action)
            && self
                .subject
                .as_deref()
                .is_none_or(|subject| entry.subject == subject)
    }
}

impl Default for AuditLogQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_AUDIT_PAGE_SIZE,
            offset: 0,
            action: None,
            subject: None,
        }
    }
}

/// Read side of the audit trail.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists a tenant's entries matching `query`, newest first.
    async fn list_recent_entries(
        &self,
        tenant_id: TenantId,
        query: AuditLogQuery,
    ) -> AppResult<Vec<AuditLogEntry>>;
}
