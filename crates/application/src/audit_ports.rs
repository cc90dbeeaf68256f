use async_trait::async_trait;
use chrono::{DateTime, Utc};

use santiye_core::{AppResult, UserId};
use santiye_domain::{AuditAction, AuditChange, AuditLogEntryId};

/// Append-only audit record emitted after a committed mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    /// Acting user.
    pub actor_id: UserId,
    /// Actor display name, kept so entries outlive the user row.
    pub actor_name: String,
    /// Stable action identifier.
    pub action: AuditAction,
    /// Tracked entity (table) name.
    pub entity_name: String,
    /// Tracked record identifier, if the action targets one record.
    pub record_id: Option<String>,
    /// What changed.
    pub change: AuditChange,
    /// Caller network address.
    pub ip_address: Option<String>,
    /// Caller client identifier.
    pub user_agent: Option<String>,
}

/// Port for persisting append-only audit records.
///
/// Implementations serialize the change payload at the storage edge.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Persists one audit record.
    async fn append_entry(&self, record: AuditRecord) -> AppResult<()>;
}

/// Stored audit entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    /// Entry identifier.
    pub id: AuditLogEntryId,
    /// Acting user.
    pub actor_id: UserId,
    /// Actor display name at the time of the action.
    pub actor_name: String,
    /// Stable action identifier.
    pub action: AuditAction,
    /// Tracked entity name.
    pub entity_name: String,
    /// Tracked record identifier.
    pub record_id: Option<String>,
    /// Decoded change payload.
    pub change: AuditChange,
    /// Caller network address.
    pub ip_address: Option<String>,
    /// Caller client identifier.
    pub user_agent: Option<String>,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
}

/// Query parameters for audit log listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditLogQuery {
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for offset pagination.
    pub offset: usize,
    /// Optional action filter.
    pub action: Option<AuditAction>,
    /// Optional tracked entity filter.
    pub entity_name: Option<String>,
    /// Optional record filter.
    pub record_id: Option<String>,
    /// Optional actor filter.
    pub actor_id: Option<UserId>,
}

/// Repository port for reading the audit trail.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Lists entries matching the query, newest first.
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>>;
}
