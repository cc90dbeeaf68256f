use async_trait::async_trait;
use sqlx::PgPool;

use santiye_application::{AuditRecord, AuditRepository};
use santiye_core::AppResult;
use santiye_domain::AuditLogEntryId;

use crate::store_error::store_error;

/// PostgreSQL-backed append-only audit repository.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_entry(&self, record: AuditRecord) -> AppResult<()> {
        let changes = record.change.to_storage()?;

        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id,
                user_id,
                user_name,
                action,
                entity_name,
                record_id,
                changes,
                ip_address,
                user_agent
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(AuditLogEntryId::new().as_uuid())
        .bind(record.actor_id.as_uuid())
        .bind(record.actor_name)
        .bind(record.action.as_str())
        .bind(record.entity_name)
        .bind(record.record_id)
        .bind(changes)
        .bind(record.ip_address)
        .bind(record.user_agent)
        .execute(&self.pool)
        .await
        .map_err(|error| store_error("failed to append audit entry", error))?;

        Ok(())
    }
}
