use async_trait::async_trait;
use rust_decimal::Decimal;

use santiye_core::{AppResult, UserId};
use santiye_domain::{
    BalanceReconciliation, Material, MaterialId, NewMaterial, NewProjectMaterialUsage,
    NewStockAdjustment, ProjectId, ProjectMaterialUsage, StockAdjustment, UsageId, UsageUpdate,
};

/// How a usage write treats a balance that would drop below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceGuard {
    /// Apply the delta even if the balance goes negative.
    AllowOverdraw,
    /// Reject with `InsufficientStock` instead of going negative.
    RejectNegative,
}

/// Material as registered, with its opening ledger entry if one was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredMaterial {
    /// Catalog row after commit.
    pub material: Material,
    /// Inbound entry for the opening balance.
    pub opening_adjustment: Option<StockAdjustment>,
}

/// Ledger entry together with the balance it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedAdjustment {
    /// Committed ledger entry.
    pub adjustment: StockAdjustment,
    /// Material balance right after the commit.
    pub balance_after: Decimal,
}

/// Usage record before and after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRevision {
    /// Row as it was before the update.
    pub previous: ProjectMaterialUsage,
    /// Row as committed.
    pub current: ProjectMaterialUsage,
}

/// Repository port for the material stock ledger.
///
/// Every mutating method must commit the ledger row and the material balance
/// change together, and must validate sufficiency in the same atomic step as
/// the balance write so concurrent callers cannot both pass a stale check.
#[async_trait]
pub trait StockLedgerRepository: Send + Sync {
    /// Creates a catalog material, recording any opening balance as an inbound entry.
    async fn create_material(
        &self,
        input: NewMaterial,
        actor_id: UserId,
    ) -> AppResult<RegisteredMaterial>;

    /// Finds one material.
    async fn find_material(&self, material_id: MaterialId) -> AppResult<Option<Material>>;

    /// Lists materials whose balance is below their reorder threshold, ordered by name.
    async fn list_low_stock_materials(&self) -> AppResult<Vec<Material>>;

    /// Appends a ledger entry and moves the material balance.
    ///
    /// Fails with `InsufficientStock` without writing when an outbound kind
    /// exceeds the balance, and with `NotFound` when the material is missing.
    async fn apply_adjustment(&self, input: NewStockAdjustment) -> AppResult<AppliedAdjustment>;

    /// Lists a material's ledger entries, oldest first.
    async fn list_adjustments(&self, material_id: MaterialId) -> AppResult<Vec<StockAdjustment>>;

    /// Records project consumption and decrements the material balance.
    async fn insert_usage(
        &self,
        input: NewProjectMaterialUsage,
        guard: BalanceGuard,
    ) -> AppResult<ProjectMaterialUsage>;

    /// Replaces a usage's values, applying the quantity difference to the balance.
    async fn update_usage(
        &self,
        usage_id: UsageId,
        update: UsageUpdate,
        guard: BalanceGuard,
    ) -> AppResult<UsageRevision>;

    /// Returns the usage quantity to the balance and removes the row.
    async fn delete_usage(&self, usage_id: UsageId) -> AppResult<ProjectMaterialUsage>;

    /// Lists a project's usage records, oldest first.
    async fn list_project_usages(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectMaterialUsage>>;

    /// Recomputes a material balance from its ledger and compares it to the cache.
    async fn reconcile_balance(&self, material_id: MaterialId)
    -> AppResult<BalanceReconciliation>;
}
