use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use santiye_application::AuditLogQuery;
use santiye_core::{AppError, UserId};
use santiye_domain::AuditAction;
use uuid::Uuid;

use crate::dto::AuditLogEntryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditLogListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub entity_name: Option<String>,
    pub record_id: Option<String>,
    pub actor_id: Option<String>,
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Query(query): Query<AuditLogListQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let action = query
        .action
        .as_deref()
        .map(str::parse::<AuditAction>)
        .transpose()?;
    let actor_id = query
        .actor_id
        .as_deref()
        .map(|value| {
            Uuid::parse_str(value).map(UserId::from_uuid).map_err(|error| {
                AppError::Validation(format!("invalid actor_id '{value}': {error}"))
            })
        })
        .transpose()?;

    let entries = state
        .audit_log_service
        .list(AuditLogQuery {
            limit: query.limit.unwrap_or(50),
            offset: query.offset.unwrap_or(0),
            action,
            entity_name: query.entity_name,
            record_id: query.record_id,
            actor_id,
        })
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
