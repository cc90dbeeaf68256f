use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use santiye_application::{
    AppliedAdjustment, BalanceGuard, RegisteredMaterial, StockLedgerRepository, UsageRevision,
};
use santiye_core::{AppError, AppResult, UserId};
use santiye_domain::{
    AdjustmentKind, BalanceReconciliation, Material, MaterialId, NewMaterial,
    NewProjectMaterialUsage, NewStockAdjustment, ProjectId, ProjectMaterialUsage,
    StockAdjustment, StockAdjustmentId, UsageId, UsageUpdate,
};

use crate::store_error::store_error;

mod adjustments;
mod materials;
mod usage;


const OPENING_BALANCE_DESCRIPTION: &str = "Açılış stoğu";

/// PostgreSQL-backed material stock ledger.
///
/// Balance checks and balance writes happen in one conditional `UPDATE` so
/// concurrent writers against the same material serialize on its row lock.
#[derive(Clone)]
pub struct PostgresStockLedgerRepository {
    pool: PgPool,
}

impl PostgresStockLedgerRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MaterialRow {
    id: Uuid,
    name: String,
    unit: String,
    unit_price: Decimal,
    stock_quantity: Decimal,
    minimum_stock: Decimal,
}

#[derive(Debug, FromRow)]
struct StockAdjustmentRow {
    id: Uuid,
    material_id: Uuid,
    quantity: Decimal,
    adjustment_type: String,
    description: Option<String>,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct UsageRow {
    id: Uuid,
    project_id: Uuid,
    material_id: Uuid,
    quantity_used: Decimal,
    unit_price_at_time: Decimal,
    date_used: NaiveDate,
}

#[derive(Debug, FromRow)]
struct BalanceRow {
    stock_quantity: Decimal,
    unit_price: Decimal,
}

#[derive(Debug, FromRow)]
struct ReconciliationRow {
    cached_balance: Decimal,
    ledger_balance: Decimal,
}

#[async_trait]
impl StockLedgerRepository for PostgresStockLedgerRepository {
    async fn create_material(
        &self,
        input: NewMaterial,
        actor_id: UserId,
    ) -> AppResult<RegisteredMaterial> {
        self.create_material_impl(input, actor_id).await
    }

    async fn find_material(&self, material_id: MaterialId) -> AppResult<Option<Material>> {
        self.find_material_impl(material_id).await
    }

    async fn list_low_stock_materials(&self) -> AppResult<Vec<Material>> {
        self.list_low_stock_materials_impl().await
    }

    async fn apply_adjustment(&self, input: NewStockAdjustment) -> AppResult<AppliedAdjustment> {
        self.apply_adjustment_impl(input).await
    }

    async fn list_adjustments(&self, material_id: MaterialId) -> AppResult<Vec<StockAdjustment>> {
        self.list_adjustments_impl(material_id).await
    }

    async fn insert_usage(
        &self,
        input: NewProjectMaterialUsage,
        guard: BalanceGuard,
    ) -> AppResult<ProjectMaterialUsage> {
        self.insert_usage_impl(input, guard).await
    }

    async fn update_usage(
        &self,
        usage_id: UsageId,
        update: UsageUpdate,
        guard: BalanceGuard,
    ) -> AppResult<UsageRevision> {
        self.update_usage_impl(usage_id, update, guard).await
    }

    async fn delete_usage(&self, usage_id: UsageId) -> AppResult<ProjectMaterialUsage> {
        self.delete_usage_impl(usage_id).await
    }

    async fn list_project_usages(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectMaterialUsage>> {
        self.list_project_usages_impl(project_id).await
    }

    async fn reconcile_balance(
        &self,
        material_id: MaterialId,
    ) -> AppResult<BalanceReconciliation> {
        let row = sqlx::query_as::<_, ReconciliationRow>(
            r#"
            SELECT
                materials.stock_quantity AS cached_balance,
                COALESCE((
                    SELECT SUM(
                        CASE adjustments.adjustment_type
                            WHEN 'IN' THEN adjustments.quantity
                            WHEN 'OUT' THEN -adjustments.quantity
                            ELSE 0
                        END
                    )
                    FROM stock_adjustments adjustments
                    WHERE adjustments.material_id = materials.id
                ), 0)
                - COALESCE((
                    SELECT SUM(usages.quantity_used)
                    FROM project_material_usages usages
                    WHERE usages.material_id = materials.id
                ), 0) AS ledger_balance
            FROM materials
            WHERE materials.id = $1
            "#,
        )
        .bind(material_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            store_error(
                &format!("failed to reconcile balance of material '{material_id}'"),
                error,
            )
        })?
        .ok_or_else(|| material_not_found(material_id))?;

        Ok(BalanceReconciliation {
            material_id,
            cached_balance: row.cached_balance,
            ledger_balance: row.ledger_balance,
        })
    }
}

/// Moves a material balance by `delta` inside `transaction`.
///
/// When `required` is set the update only applies if the current balance
/// covers it; `None` is returned both for a failed guard and for a missing
/// material so callers can tell them apart with [`balance_rejection`].
async fn move_balance(
    transaction: &mut Transaction<'_, Postgres>,
    material_id: MaterialId,
    delta: Decimal,
    required: Option<Decimal>,
) -> AppResult<Option<BalanceRow>> {
    sqlx::query_as::<_, BalanceRow>(
        r#"
        UPDATE materials
        SET
            stock_quantity = stock_quantity + $2,
            updated_at = now()
        WHERE id = $1
          AND ($3::NUMERIC IS NULL OR stock_quantity >= $3)
        RETURNING stock_quantity, unit_price
        "#,
    )
    .bind(material_id.as_uuid())
    .bind(delta)
    .bind(required)
    .fetch_optional(&mut **transaction)
    .await
    .map_err(|error| {
        store_error(
            &format!("failed to move balance of material '{material_id}'"),
            error,
        )
    })
}

/// Explains why a guarded [`move_balance`] did not apply.
async fn balance_rejection(
    transaction: &mut Transaction<'_, Postgres>,
    material_id: MaterialId,
    requested: Decimal,
) -> AppError {
    let available = sqlx::query_scalar::<_, Decimal>(
        r#"
        SELECT stock_quantity
        FROM materials
        WHERE id = $1
        "#,
    )
    .bind(material_id.as_uuid())
    .fetch_optional(&mut **transaction)
    .await;

    match available {
        Ok(Some(available)) => AppError::InsufficientStock {
            material_id: material_id.as_uuid(),
            requested,
            available,
        },
        Ok(None) => material_not_found(material_id),
        Err(error) => store_error(
            &format!("failed to read balance of material '{material_id}'"),
            error,
        ),
    }
}

fn required_balance(guard: BalanceGuard, delta: Decimal) -> Option<Decimal> {
    match guard {
        BalanceGuard::RejectNegative if delta < Decimal::ZERO => Some(-delta),
        _ => None,
    }
}

async fn insert_adjustment_row(
    transaction: &mut Transaction<'_, Postgres>,
    material_id: MaterialId,
    kind: AdjustmentKind,
    quantity: Decimal,
    description: Option<&str>,
    actor_id: UserId,
) -> AppResult<StockAdjustment> {
    let row = sqlx::query_as::<_, StockAdjustmentRow>(
        r#"
        INSERT INTO stock_adjustments (
            id,
            material_id,
            quantity,
            adjustment_type,
            description,
            user_id,
            created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, clock_timestamp())
        RETURNING id, material_id, quantity, adjustment_type, description, user_id, created_at
        "#,
    )
    .bind(StockAdjustmentId::new().as_uuid())
    .bind(material_id.as_uuid())
    .bind(quantity)
    .bind(kind.as_str())
    .bind(description)
    .bind(actor_id.as_uuid())
    .fetch_one(&mut **transaction)
    .await
    .map_err(|error| {
        store_error(
            &format!("failed to insert stock adjustment for material '{material_id}'"),
            error,
        )
    })?;

    adjustment_from_row(row)
}

fn material_not_found(material_id: MaterialId) -> AppError {
    AppError::NotFound(format!("material '{material_id}' does not exist"))
}

fn material_from_row(row: MaterialRow) -> AppResult<Material> {
    Material::new(
        MaterialId::from_uuid(row.id),
        row.name,
        row.unit,
        row.unit_price,
        row.stock_quantity,
        row.minimum_stock,
    )
}

fn adjustment_from_row(row: StockAdjustmentRow) -> AppResult<StockAdjustment> {
    Ok(StockAdjustment {
        id: StockAdjustmentId::from_uuid(row.id),
        material_id: MaterialId::from_uuid(row.material_id),
        quantity: row.quantity,
        kind: AdjustmentKind::from_str(row.adjustment_type.as_str())?,
        description: row.description,
        actor_id: UserId::from_uuid(row.user_id),
        created_at: row.created_at,
    })
}

fn usage_from_row(row: UsageRow) -> ProjectMaterialUsage {
    ProjectMaterialUsage {
        id: UsageId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        material_id: MaterialId::from_uuid(row.material_id),
        quantity_used: row.quantity_used,
        unit_price_at_time: row.unit_price_at_time,
        date_used: row.date_used,
    }
}
