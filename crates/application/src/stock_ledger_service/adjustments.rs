use rust_decimal::Decimal;
use tracing::{debug, info};

use santiye_core::{ActorContext, AppError, AppResult};
use santiye_domain::{
    AdjustmentKind, AuditAction, AuditChange, MaterialId, NewStockAdjustment, StockAdjustment,
};

use super::{STOCK_ADJUSTMENTS_ENTITY, StockLedgerService};

impl StockLedgerService {
    /// Appends a stock ledger entry and moves the material balance.
    ///
    /// Outbound and transfer entries fail with `InsufficientStock` when the
    /// quantity exceeds the balance; nothing is written and nothing is audited
    /// in that case.
    pub async fn apply_adjustment(
        &self,
        actor: &ActorContext,
        material_id: MaterialId,
        kind: AdjustmentKind,
        quantity: Decimal,
        description: Option<String>,
    ) -> AppResult<StockAdjustment> {
        let input =
            NewStockAdjustment::new(material_id, kind, quantity, description, actor.user_id())?;

        let applied = match self.repository.apply_adjustment(input).await {
            Ok(applied) => applied,
            Err(error) => {
                if let AppError::InsufficientStock {
                    requested,
                    available,
                    ..
                } = &error
                {
                    debug!(
                        material_id = %material_id,
                        kind = kind.as_str(),
                        requested = %requested,
                        available = %available,
                        "stock adjustment rejected"
                    );
                }
                return Err(error);
            }
        };

        info!(
            material_id = %material_id,
            adjustment_id = %applied.adjustment.id,
            kind = kind.as_str(),
            quantity = %applied.adjustment.quantity,
            balance_after = %applied.balance_after,
            "stock adjustment committed"
        );

        self.audit(
            actor,
            AuditAction::Transaction,
            STOCK_ADJUSTMENTS_ENTITY,
            applied.adjustment.id.to_string(),
            AuditChange::created(&applied.adjustment),
        )
        .await;

        Ok(applied.adjustment)
    }
}
