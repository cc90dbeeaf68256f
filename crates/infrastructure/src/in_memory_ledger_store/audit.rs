use super::*;

#[async_trait]
impl AuditRepository for InMemoryLedgerStore {
    async fn append_entry(&self, record: AuditRecord) -> AppResult<()> {
        self.state.lock().await.audit_log.push(AuditLogEntry {
            id: AuditLogEntryId::new(),
            actor_id: record.actor_id,
            actor_name: record.actor_name,
            action: record.action,
            entity_name: record.entity_name,
            record_id: record.record_id,
            change: record.change,
            ip_address: record.ip_address,
            user_agent: record.user_agent,
            created_at: Utc::now(),
        });

        Ok(())
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryLedgerStore {
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let state = self.state.lock().await;

        Ok(state
            .audit_log
            .iter()
            .rev()
            .filter(|entry| query.action.is_none_or(|action| entry.action == action))
            .filter(|entry| {
                query
                    .entity_name
                    .as_deref()
                    .is_none_or(|entity_name| entry.entity_name == entity_name)
            })
            .filter(|entry| {
                query
                    .record_id
                    .as_deref()
                    .is_none_or(|record_id| entry.record_id.as_deref() == Some(record_id))
            })
            .filter(|entry| query.actor_id.is_none_or(|actor_id| entry.actor_id == actor_id))
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}
