use super::*;

impl PostgresStockLedgerRepository {
    pub(super) async fn apply_adjustment_impl(
        &self,
        input: NewStockAdjustment,
    ) -> AppResult<AppliedAdjustment> {
        input.check_storable()?;
        let material_id = input.material_id;
        let required = input
            .kind
            .requires_available_stock()
            .then_some(input.quantity);

        let mut transaction = self.pool.begin().await.map_err(|error| {
            store_error("failed to start stock adjustment transaction", error)
        })?;

        let Some(balance) = move_balance(
            &mut transaction,
            material_id,
            input.kind.signed_delta(input.quantity),
            required,
        )
        .await?
        else {
            return Err(balance_rejection(&mut transaction, material_id, input.quantity).await);
        };

        let adjustment = insert_adjustment_row(
            &mut transaction,
            material_id,
            input.kind,
            input.quantity,
            input.description.as_deref(),
            input.actor_id,
        )
        .await?;

        transaction.commit().await.map_err(|error| {
            store_error("failed to commit stock adjustment transaction", error)
        })?;

        Ok(AppliedAdjustment {
            adjustment,
            balance_after: balance.stock_quantity,
        })
    }

    pub(super) async fn list_adjustments_impl(
        &self,
        material_id: MaterialId,
    ) -> AppResult<Vec<StockAdjustment>> {
        let rows = sqlx::query_as::<_, StockAdjustmentRow>(
            r#"
            SELECT id, material_id, quantity, adjustment_type, description, user_id, created_at
            FROM stock_adjustments
            WHERE material_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(material_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to list adjustments of material '{material_id}'"),
                error,
            )
        })?;

        rows.into_iter().map(adjustment_from_row).collect()
    }
}
