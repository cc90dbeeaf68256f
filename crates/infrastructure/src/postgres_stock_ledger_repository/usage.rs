use super::*;

const USAGE_COLUMNS: &str =
    "id, project_id, material_id, quantity_used, unit_price_at_time, date_used";

impl PostgresStockLedgerRepository {
    pub(super) async fn insert_usage_impl(
        &self,
        input: NewProjectMaterialUsage,
        guard: BalanceGuard,
    ) -> AppResult<ProjectMaterialUsage> {
        input.check_storable()?;
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| store_error("failed to start usage insert transaction", error))?;

        let project_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)
            "#,
        )
        .bind(input.project_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to look up project '{}'", input.project_id),
                error,
            )
        })?;
        if !project_exists {
            return Err(AppError::NotFound(format!(
                "project '{}' does not exist",
                input.project_id
            )));
        }

        let delta = -input.quantity_used;
        let Some(balance) = move_balance(
            &mut transaction,
            input.material_id,
            delta,
            required_balance(guard, delta),
        )
        .await?
        else {
            return Err(
                balance_rejection(&mut transaction, input.material_id, input.quantity_used).await,
            );
        };

        let row = sqlx::query_as::<_, UsageRow>(&format!(
            r#"
            INSERT INTO project_material_usages (
                id,
                project_id,
                material_id,
                quantity_used,
                unit_price_at_time,
                date_used
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USAGE_COLUMNS}
            "#
        ))
        .bind(UsageId::new().as_uuid())
        .bind(input.project_id.as_uuid())
        .bind(input.material_id.as_uuid())
        .bind(input.quantity_used)
        .bind(input.unit_price_at_time.unwrap_or(balance.unit_price))
        .bind(input.date_used)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| store_error("failed to insert project material usage", error))?;

        transaction
            .commit()
            .await
            .map_err(|error| store_error("failed to commit usage insert transaction", error))?;

        Ok(usage_from_row(row))
    }

    pub(super) async fn update_usage_impl(
        &self,
        usage_id: UsageId,
        update: UsageUpdate,
        guard: BalanceGuard,
    ) -> AppResult<UsageRevision> {
        update.check_storable()?;
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| store_error("failed to start usage update transaction", error))?;

        let previous = sqlx::query_as::<_, UsageRow>(&format!(
            r#"
            SELECT {USAGE_COLUMNS}
            FROM project_material_usages
            WHERE id = $1
            FOR UPDATE
            "#
        ))
        .bind(usage_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| store_error(&format!("failed to lock usage '{usage_id}'"), error))?
        .map(usage_from_row)
        .ok_or_else(|| usage_not_found(usage_id))?;

        let delta = update.balance_delta(&previous);
        if !delta.is_zero() {
            let applied = move_balance(
                &mut transaction,
                previous.material_id,
                delta,
                required_balance(guard, delta),
            )
            .await?;
            if applied.is_none() {
                return Err(
                    balance_rejection(&mut transaction, previous.material_id, -delta).await,
                );
            }
        }

        let current = update.apply_to(&previous);
        sqlx::query(
            r#"
            UPDATE project_material_usages
            SET
                quantity_used = $2,
                unit_price_at_time = $3,
                date_used = $4
            WHERE id = $1
            "#,
        )
        .bind(usage_id.as_uuid())
        .bind(current.quantity_used)
        .bind(current.unit_price_at_time)
        .bind(current.date_used)
        .execute(&mut *transaction)
        .await
        .map_err(|error| store_error(&format!("failed to update usage '{usage_id}'"), error))?;

        transaction
            .commit()
            .await
            .map_err(|error| store_error("failed to commit usage update transaction", error))?;

        Ok(UsageRevision { previous, current })
    }

    pub(super) async fn delete_usage_impl(
        &self,
        usage_id: UsageId,
    ) -> AppResult<ProjectMaterialUsage> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .map_err(|error| store_error("failed to start usage delete transaction", error))?;

        let removed = sqlx::query_as::<_, UsageRow>(&format!(
            r#"
            DELETE FROM project_material_usages
            WHERE id = $1
            RETURNING {USAGE_COLUMNS}
            "#
        ))
        .bind(usage_id.as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| store_error(&format!("failed to delete usage '{usage_id}'"), error))?
        .map(usage_from_row)
        .ok_or_else(|| usage_not_found(usage_id))?;

        move_balance(
            &mut transaction,
            removed.material_id,
            removed.quantity_used,
            None,
        )
        .await?
        .ok_or_else(|| material_not_found(removed.material_id))?;

        transaction
            .commit()
            .await
            .map_err(|error| store_error("failed to commit usage delete transaction", error))?;

        Ok(removed)
    }

    pub(super) async fn list_project_usages_impl(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectMaterialUsage>> {
        let rows = sqlx::query_as::<_, UsageRow>(&format!(
            r#"
            SELECT {USAGE_COLUMNS}
            FROM project_material_usages
            WHERE project_id = $1
            ORDER BY date_used ASC, created_at ASC, id ASC
            "#
        ))
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to list usages of project '{project_id}'"),
                error,
            )
        })?;

        Ok(rows.into_iter().map(usage_from_row).collect())
    }
}

fn usage_not_found(usage_id: UsageId) -> AppError {
    AppError::NotFound(format!("usage '{usage_id}' does not exist"))
}
