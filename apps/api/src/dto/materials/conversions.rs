use rust_decimal::Decimal;
use santiye_core::AppError;
use santiye_domain::{BalanceReconciliation, Material, NewMaterial, StockAdjustment};

use super::{
    BalanceReconciliationResponse, MaterialResponse, RegisterMaterialRequest,
    StockAdjustmentResponse,
};
use crate::dto::common::{parse_amount, parse_optional_amount, parse_quantity};

impl TryFrom<RegisterMaterialRequest> for NewMaterial {
    type Error = AppError;

    fn try_from(value: RegisterMaterialRequest) -> Result<Self, Self::Error> {
        let opening_stock = value
            .opening_stock
            .as_deref()
            .map(str::trim)
            .filter(|quantity| !quantity.is_empty())
            .map(|quantity| parse_quantity("opening_stock", quantity))
            .transpose()?;

        Ok(Self {
            name: value.name.trim().to_owned(),
            unit: value.unit.trim().to_owned(),
            unit_price: parse_amount("unit_price", &value.unit_price)?,
            minimum_stock: parse_optional_amount("minimum_stock", value.minimum_stock.as_deref())?
                .unwrap_or(Decimal::ZERO),
            opening_stock,
        })
    }
}

impl From<Material> for MaterialResponse {
    fn from(value: Material) -> Self {
        Self {
            material_id: value.id().to_string(),
            name: value.name().as_str().to_owned(),
            unit: value.unit().as_str().to_owned(),
            unit_price: value.unit_price().to_string(),
            stock_quantity: value.stock_quantity().to_string(),
            minimum_stock: value.minimum_stock().to_string(),
            below_minimum: value.is_below_minimum(),
        }
    }
}

impl From<StockAdjustment> for StockAdjustmentResponse {
    fn from(value: StockAdjustment) -> Self {
        Self {
            adjustment_id: value.id.to_string(),
            material_id: value.material_id.to_string(),
            kind: value.kind.as_str().to_owned(),
            quantity: value.quantity.to_string(),
            description: value.description,
            actor_id: value.actor_id.to_string(),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

impl From<BalanceReconciliation> for BalanceReconciliationResponse {
    fn from(value: BalanceReconciliation) -> Self {
        Self {
            consistent: value.is_consistent(),
            material_id: value.material_id.to_string(),
            cached_balance: value.cached_balance.to_string(),
            ledger_balance: value.ledger_balance.to_string(),
        }
    }
}
