use santiye_application::AuditLogEntry;
use tracing::warn;

use super::AuditLogEntryResponse;

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        let changes = value.change.to_storage().unwrap_or_else(|error| {
            warn!(
                entry_id = %value.id,
                error = %error,
                "audit change payload could not be encoded"
            );
            String::new()
        });

        Self {
            entry_id: value.id.to_string(),
            actor_id: value.actor_id.to_string(),
            actor_name: value.actor_name,
            action: value.action.as_str().to_owned(),
            entity_name: value.entity_name,
            record_id: value.record_id,
            changed_fields: value.change.changed_fields(),
            changes,
            ip_address: value.ip_address,
            user_agent: value.user_agent,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
