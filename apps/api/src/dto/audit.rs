use serde::Serialize;
use ts_rs::TS;

mod conversions;

/// API representation of one audit trail entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub entry_id: String,
    pub actor_id: String,
    pub actor_name: String,
    pub action: String,
    pub entity_name: String,
    pub record_id: Option<String>,
    /// Stored JSON change payload.
    pub changes: String,
    pub changed_fields: Vec<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: String,
}
