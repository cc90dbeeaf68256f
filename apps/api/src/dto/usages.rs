use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Incoming payload for recording project consumption.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/record-usage-request.ts"
)]
pub struct RecordUsageRequest {
    pub project_id: String,
    pub material_id: String,
    pub quantity_used: String,
    /// Defaults to the material's current unit price.
    pub unit_price_at_time: Option<String>,
    /// `YYYY-MM-DD`; defaults to today.
    pub date_used: Option<String>,
}

/// Incoming payload for revising a usage record.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-usage-request.ts"
)]
pub struct UpdateUsageRequest {
    pub quantity_used: String,
    pub unit_price_at_time: Option<String>,
    pub date_used: Option<String>,
}

/// API representation of a project usage record.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/usage-response.ts"
)]
pub struct UsageResponse {
    pub usage_id: String,
    pub project_id: String,
    pub material_id: String,
    pub quantity_used: String,
    pub unit_price_at_time: String,
    pub total_cost: String,
    pub date_used: String,
}
