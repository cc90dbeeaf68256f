use axum::Json;
use axum::extract::{Query, State};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::dto::{AttendanceReportRowResponse, BudgetAlertRowResponse, parse_amount};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_BUDGET_ALERT_THRESHOLD: i64 = 80;

#[derive(Debug, Deserialize)]
pub struct AttendanceReportQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct BudgetAlertQuery {
    pub threshold: Option<String>,
}

pub async fn attendance_report_handler(
    State(state): State<AppState>,
    Query(query): Query<AttendanceReportQuery>,
) -> ApiResult<Json<Vec<AttendanceReportRowResponse>>> {
    let rows = state
        .reporting_service
        .attendance_report(query.year, query.month)
        .await?
        .into_iter()
        .map(AttendanceReportRowResponse::from)
        .collect();

    Ok(Json(rows))
}

pub async fn budget_alert_report_handler(
    State(state): State<AppState>,
    Query(query): Query<BudgetAlertQuery>,
) -> ApiResult<Json<Vec<BudgetAlertRowResponse>>> {
    let threshold = match query.threshold.as_deref() {
        Some(value) => parse_amount("threshold", value)?,
        None => Decimal::from(DEFAULT_BUDGET_ALERT_THRESHOLD),
    };

    let rows = state
        .reporting_service
        .budget_alert_report(threshold)
        .await?
        .into_iter()
        .map(BudgetAlertRowResponse::from)
        .collect();

    Ok(Json(rows))
}
