use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Incoming payload for material registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/register-material-request.ts"
)]
pub struct RegisterMaterialRequest {
    pub name: String,
    pub unit: String,
    pub unit_price: String,
    pub minimum_stock: Option<String>,
    pub opening_stock: Option<String>,
}

/// Incoming payload for a stock ledger entry.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/apply-adjustment-request.ts"
)]
pub struct ApplyAdjustmentRequest {
    /// `IN`, `OUT` or `TRANSFER`.
    pub kind: String,
    pub quantity: String,
    pub description: Option<String>,
}

/// API representation of a catalog material.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/material-response.ts"
)]
pub struct MaterialResponse {
    pub material_id: String,
    pub name: String,
    pub unit: String,
    pub unit_price: String,
    pub stock_quantity: String,
    pub minimum_stock: String,
    pub below_minimum: bool,
}

/// API representation of a stock ledger entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/stock-adjustment-response.ts"
)]
pub struct StockAdjustmentResponse {
    pub adjustment_id: String,
    pub material_id: String,
    pub kind: String,
    pub quantity: String,
    pub description: Option<String>,
    pub actor_id: String,
    pub created_at: String,
}

/// Cached balance compared with the ledger sum.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/balance-reconciliation-response.ts"
)]
pub struct BalanceReconciliationResponse {
    pub material_id: String,
    pub cached_balance: String,
    pub ledger_balance: String,
    pub consistent: bool,
}
