use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use santiye_domain::{AdjustmentKind, MaterialId, NewMaterial};

use crate::actor::RequestActor;
use crate::dto::{
    ApplyAdjustmentRequest, BalanceReconciliationResponse, MaterialResponse,
    RegisterMaterialRequest, StockAdjustmentResponse, parse_identifier, parse_quantity,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_material_handler(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(payload): Json<RegisterMaterialRequest>,
) -> ApiResult<(StatusCode, Json<MaterialResponse>)> {
    let material = state
        .stock_ledger_service
        .register_material(&actor, NewMaterial::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(MaterialResponse::from(material))))
}

pub async fn get_material_handler(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
) -> ApiResult<Json<MaterialResponse>> {
    let material = state
        .stock_ledger_service
        .material(parse_identifier::<MaterialId>(&material_id)?)
        .await?;

    Ok(Json(MaterialResponse::from(material)))
}

pub async fn list_low_stock_materials_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MaterialResponse>>> {
    let materials = state
        .stock_ledger_service
        .low_stock_materials()
        .await?
        .into_iter()
        .map(MaterialResponse::from)
        .collect();

    Ok(Json(materials))
}

pub async fn list_adjustments_handler(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
) -> ApiResult<Json<Vec<StockAdjustmentResponse>>> {
    let adjustments = state
        .stock_ledger_service
        .list_adjustments(parse_identifier::<MaterialId>(&material_id)?)
        .await?
        .into_iter()
        .map(StockAdjustmentResponse::from)
        .collect();

    Ok(Json(adjustments))
}

pub async fn apply_adjustment_handler(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(material_id): Path<String>,
    Json(payload): Json<ApplyAdjustmentRequest>,
) -> ApiResult<(StatusCode, Json<StockAdjustmentResponse>)> {
    let material_id = parse_identifier::<MaterialId>(&material_id)?;
    let kind = AdjustmentKind::from_str(&payload.kind)?;
    let quantity = parse_quantity("quantity", &payload.quantity)?;

    let adjustment = state
        .stock_ledger_service
        .apply_adjustment(&actor, material_id, kind, quantity, payload.description)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(StockAdjustmentResponse::from(adjustment)),
    ))
}

pub async fn verify_balance_handler(
    State(state): State<AppState>,
    Path(material_id): Path<String>,
) -> ApiResult<Json<BalanceReconciliationResponse>> {
    let reconciliation = state
        .stock_ledger_service
        .verify_balance(parse_identifier::<MaterialId>(&material_id)?)
        .await?;

    Ok(Json(BalanceReconciliationResponse::from(reconciliation)))
}
