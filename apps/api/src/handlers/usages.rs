use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;

use santiye_domain::{ProjectId, UsageId, UsageUpdate};

use crate::actor::RequestActor;
use crate::dto::{RecordUsageRequest, UpdateUsageRequest, UsageResponse, parse_identifier};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn record_usage_handler(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(payload): Json<RecordUsageRequest>,
) -> ApiResult<(StatusCode, Json<UsageResponse>)> {
    let input = payload.into_new_usage(Utc::now().date_naive())?;
    let usage = state
        .stock_ledger_service
        .record_usage(&actor, input)
        .await?;

    Ok((StatusCode::CREATED, Json(UsageResponse::from(usage))))
}

pub async fn update_usage_handler(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(usage_id): Path<String>,
    Json(payload): Json<UpdateUsageRequest>,
) -> ApiResult<Json<UsageResponse>> {
    let usage_id = parse_identifier::<UsageId>(&usage_id)?;
    let usage = state
        .stock_ledger_service
        .update_usage(&actor, usage_id, UsageUpdate::try_from(payload)?)
        .await?;

    Ok(Json(UsageResponse::from(usage)))
}

pub async fn delete_usage_handler(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(usage_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .stock_ledger_service
        .delete_usage(&actor, parse_identifier::<UsageId>(&usage_id)?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_project_usages_handler(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Vec<UsageResponse>>> {
    let usages = state
        .stock_ledger_service
        .list_project_usages(parse_identifier::<ProjectId>(&project_id)?)
        .await?
        .into_iter()
        .map(UsageResponse::from)
        .collect();

    Ok(Json(usages))
}
