use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use santiye_application::{AuditLogEntry, AuditLogQuery, AuditLogRepository};
use santiye_core::{AppError, AppResult, UserId};
use santiye_domain::{AuditAction, AuditChange, AuditLogEntryId};

use crate::store_error::store_error;

/// PostgreSQL-backed repository for reading the audit trail.
#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: Uuid,
    user_id: Uuid,
    user_name: String,
    action: String,
    entity_name: String,
    record_id: Option<String>,
    changes: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn list_entries(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let limit = i64::try_from(query.limit)
            .map_err(|error| AppError::Validation(format!("invalid audit log limit: {error}")))?;
        let offset = i64::try_from(query.offset)
            .map_err(|error| AppError::Validation(format!("invalid audit log offset: {error}")))?;

        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT
                id,
                user_id,
                user_name,
                action,
                entity_name,
                record_id,
                changes,
                ip_address,
                user_agent,
                created_at
            FROM audit_logs
            WHERE ($1::TEXT IS NULL OR action = $1)
                AND ($2::TEXT IS NULL OR entity_name = $2)
                AND ($3::TEXT IS NULL OR record_id = $3)
                AND ($4::UUID IS NULL OR user_id = $4)
            ORDER BY created_at DESC, id DESC
            LIMIT $5
            OFFSET $6
            "#,
        )
        .bind(query.action.map(|action| action.as_str()))
        .bind(query.entity_name)
        .bind(query.record_id)
        .bind(query.actor_id.map(|actor_id| actor_id.as_uuid()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("failed to list audit log entries", error))?;

        rows.into_iter().map(entry_from_row).collect()
    }
}

fn entry_from_row(row: AuditLogRow) -> AppResult<AuditLogEntry> {
    // Rows written before payloads were structured hold free text.
    let change = match AuditChange::from_storage(row.changes.as_str()) {
        Ok(change) => change,
        Err(error) => {
            debug!(
                entry_id = %row.id,
                error = %error,
                "reading unstructured audit payload as text"
            );
            AuditChange::message(row.changes)
        }
    };

    Ok(AuditLogEntry {
        id: AuditLogEntryId::from_uuid(row.id),
        actor_id: UserId::from_uuid(row.user_id),
        actor_name: row.user_name,
        action: AuditAction::from_str(row.action.as_str())?,
        entity_name: row.entity_name,
        record_id: row.record_id,
        change,
        ip_address: row.ip_address,
        user_agent: row.user_agent,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests;
