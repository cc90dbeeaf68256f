use super::*;

impl PostgresStockLedgerRepository {
    pub(super) async fn create_material_impl(
        &self,
        input: NewMaterial,
        actor_id: UserId,
    ) -> AppResult<RegisteredMaterial> {
        input.check_storable()?;
        let material_id = MaterialId::new();
        let mut transaction = self.pool.begin().await.map_err(|error| {
            store_error("failed to start material registration transaction", error)
        })?;

        let row = sqlx::query_as::<_, MaterialRow>(
            r#"
            INSERT INTO materials (
                id,
                name,
                unit,
                unit_price,
                stock_quantity,
                minimum_stock
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, unit, unit_price, stock_quantity, minimum_stock
            "#,
        )
        .bind(material_id.as_uuid())
        .bind(input.name.trim())
        .bind(input.unit.trim())
        .bind(input.unit_price)
        .bind(input.opening_stock.unwrap_or(Decimal::ZERO))
        .bind(input.minimum_stock)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to insert material '{}'", input.name.trim()),
                error,
            )
        })?;

        let opening_adjustment = match input.opening_stock {
            Some(quantity) => Some(
                insert_adjustment_row(
                    &mut transaction,
                    material_id,
                    AdjustmentKind::In,
                    quantity,
                    Some(OPENING_BALANCE_DESCRIPTION),
                    actor_id,
                )
                .await?,
            ),
            None => None,
        };

        transaction.commit().await.map_err(|error| {
            store_error("failed to commit material registration transaction", error)
        })?;

        Ok(RegisteredMaterial {
            material: material_from_row(row)?,
            opening_adjustment,
        })
    }

    pub(super) async fn find_material_impl(
        &self,
        material_id: MaterialId,
    ) -> AppResult<Option<Material>> {
        sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, name, unit, unit_price, stock_quantity, minimum_stock
            FROM materials
            WHERE id = $1
            "#,
        )
        .bind(material_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| store_error(&format!("failed to find material '{material_id}'"), error))?
        .map(material_from_row)
        .transpose()
    }

    pub(super) async fn list_low_stock_materials_impl(&self) -> AppResult<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, name, unit, unit_price, stock_quantity, minimum_stock
            FROM materials
            WHERE stock_quantity < minimum_stock
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("failed to list low stock materials", error))?;

        rows.into_iter().map(material_from_row).collect()
    }
}
