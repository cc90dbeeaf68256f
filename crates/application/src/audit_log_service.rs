use std::sync::Arc;

use santiye_core::AppResult;

use crate::{AuditLogEntry, AuditLogQuery, AuditLogRepository};

const MAX_PAGE_SIZE: usize = 200;
const MAX_OFFSET: usize = 50_000;

/// Read access to the audit trail.
#[derive(Clone)]
pub struct AuditLogService {
    repository: Arc<dyn AuditLogRepository>,
}

impl AuditLogService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuditLogRepository>) -> Self {
        Self { repository }
    }

    /// Lists audit entries newest first, clamping pagination to sane bounds.
    pub async fn list(&self, mut query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        query.limit = query.limit.clamp(1, MAX_PAGE_SIZE);
        query.offset = query.offset.min(MAX_OFFSET);
        query.entity_name = query
            .entity_name
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        self.repository.list_entries(query).await
    }
}
