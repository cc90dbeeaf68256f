use tracing::info;

use santiye_core::{ActorContext, AppResult, NonEmptyString};
use santiye_domain::{AuditAction, AuditChange, Material, NewMaterial};

use super::{MATERIALS_ENTITY, STOCK_ADJUSTMENTS_ENTITY, StockLedgerService};

impl StockLedgerService {
    /// Registers a catalog material and audits its creation.
    ///
    /// A positive opening balance is committed as an inbound ledger entry in
    /// the same transaction as the catalog row.
    pub async fn register_material(
        &self,
        actor: &ActorContext,
        mut input: NewMaterial,
    ) -> AppResult<Material> {
        NonEmptyString::new(input.name.as_str())?;
        NonEmptyString::new(input.unit.as_str())?;
        input.opening_stock = input.opening_stock.filter(|quantity| !quantity.is_zero());
        input.check_storable()?;

        let registered = self
            .repository
            .create_material(input, actor.user_id())
            .await?;
        let material = registered.material;

        info!(
            material_id = %material.id(),
            name = material.name().as_str(),
            opening_balance = %material.stock_quantity(),
            "material registered"
        );

        self.audit(
            actor,
            AuditAction::Create,
            MATERIALS_ENTITY,
            material.id().to_string(),
            AuditChange::created(&material),
        )
        .await;

        if let Some(adjustment) = registered.opening_adjustment {
            self.audit(
                actor,
                AuditAction::Transaction,
                STOCK_ADJUSTMENTS_ENTITY,
                adjustment.id.to_string(),
                AuditChange::created(&adjustment),
            )
            .await;
        }

        Ok(material)
    }
}
