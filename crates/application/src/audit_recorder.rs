use std::sync::Arc;
use std::time::Duration;

use santiye_core::ActorContext;
use santiye_domain::{AuditAction, AuditChange};
use tracing::warn;

use crate::{AuditRecord, AuditRepository};

const DEFAULT_APPEND_TIMEOUT: Duration = Duration::from_secs(2);

/// Best-effort writer for the audit trail.
///
/// Callers invoke it only after their mutation has committed. Recording never
/// returns an error: store failures and timeouts are logged and dropped.
///
/// The append runs inline on the caller's task, so a slow audit store delays
/// the response by at most the append timeout (two seconds unless overridden
/// with [`AuditRecorder::with_append_timeout`]). Once the response is sent the
/// entry has either been written or been logged as abandoned; no write is left
/// running in the background after shutdown.
#[derive(Clone)]
pub struct AuditRecorder {
    repository: Arc<dyn AuditRepository>,
    append_timeout: Duration,
}

impl AuditRecorder {
    /// Creates a recorder over an audit store.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditRepository>) -> Self {
        Self {
            repository,
            append_timeout: DEFAULT_APPEND_TIMEOUT,
        }
    }

    /// Overrides how long one append may take before it is abandoned.
    #[must_use]
    pub fn with_append_timeout(mut self, append_timeout: Duration) -> Self {
        self.append_timeout = append_timeout;
        self
    }

    /// Records one action performed by `actor`.
    pub async fn record(
        &self,
        actor: &ActorContext,
        action: AuditAction,
        entity_name: &str,
        record_id: Option<String>,
        change: AuditChange,
    ) {
        self.record_entry(AuditRecord {
            actor_id: actor.user_id(),
            actor_name: actor.display_name().to_owned(),
            action,
            entity_name: entity_name.to_owned(),
            record_id,
            change,
            ip_address: actor.origin().ip_address().map(str::to_owned),
            user_agent: actor.origin().user_agent().map(str::to_owned),
        })
        .await;
    }

    /// Records a prepared entry, waiting at most the append timeout.
    pub async fn record_entry(&self, record: AuditRecord) {
        let action = record.action;
        let entity_name = record.entity_name.clone();
        let record_id = record.record_id.clone();

        match tokio::time::timeout(self.append_timeout, self.repository.append_entry(record)).await
        {
            Ok(Ok(())) => {}
            Ok(Err(error)) => warn!(
                action = action.as_str(),
                entity_name = %entity_name,
                record_id = record_id.as_deref().unwrap_or("-"),
                error = %error,
                "failed to append audit entry"
            ),
            Err(_) => warn!(
                action = action.as_str(),
                entity_name = %entity_name,
                record_id = record_id.as_deref().unwrap_or("-"),
                timeout_ms = self.append_timeout.as_millis() as u64,
                "audit append timed out"
            ),
        }
    }
}
