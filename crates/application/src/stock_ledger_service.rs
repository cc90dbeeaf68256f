use std::sync::Arc;

use santiye_core::{ActorContext, AppError, AppResult};
use santiye_domain::{
    AuditAction, AuditChange, BalanceReconciliation, Material, MaterialId, ProjectId,
    ProjectMaterialUsage, StockAdjustment,
};
use tracing::warn;

use crate::{AuditRecorder, BalanceGuard, StockLedgerRepository};

mod adjustments;
mod materials;
mod usage;

#[cfg(test)]
mod tests;

/// Audited entity name for catalog materials.
pub const MATERIALS_ENTITY: &str = "materials";
/// Audited entity name for stock ledger entries.
pub const STOCK_ADJUSTMENTS_ENTITY: &str = "stock_adjustments";
/// Audited entity name for project usage records.
pub const PROJECT_MATERIAL_USAGES_ENTITY: &str = "project_material_usages";

/// Switches governing ledger behaviour that product owners have not settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerPolicy {
    /// Reject usage writes that would drive a balance negative.
    ///
    /// Off by default: project usage may overdraw stock while outbound
    /// adjustments may not.
    pub enforce_non_negative_on_usage: bool,
}

impl LedgerPolicy {
    pub(crate) fn usage_guard(&self) -> BalanceGuard {
        if self.enforce_non_negative_on_usage {
            BalanceGuard::RejectNegative
        } else {
            BalanceGuard::AllowOverdraw
        }
    }
}

/// Application service owning every write to material balances.
#[derive(Clone)]
pub struct StockLedgerService {
    repository: Arc<dyn StockLedgerRepository>,
    audit_recorder: AuditRecorder,
    policy: LedgerPolicy,
}

impl StockLedgerService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn StockLedgerRepository>,
        audit_recorder: AuditRecorder,
        policy: LedgerPolicy,
    ) -> Self {
        Self {
            repository,
            audit_recorder,
            policy,
        }
    }

    /// Returns one material or `NotFound`.
    pub async fn material(&self, material_id: MaterialId) -> AppResult<Material> {
        self.repository
            .find_material(material_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("material '{material_id}' does not exist")))
    }

    /// Lists a material's ledger entries, oldest first.
    pub async fn list_adjustments(
        &self,
        material_id: MaterialId,
    ) -> AppResult<Vec<StockAdjustment>> {
        self.material(material_id).await?;
        self.repository.list_adjustments(material_id).await
    }

    /// Lists a project's usage records, oldest first.
    pub async fn list_project_usages(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectMaterialUsage>> {
        self.repository.list_project_usages(project_id).await
    }

    /// Lists materials below their reorder threshold.
    pub async fn low_stock_materials(&self) -> AppResult<Vec<Material>> {
        self.repository.list_low_stock_materials().await
    }

    /// Compares a material's cached balance with the sum of its ledger.
    pub async fn verify_balance(&self, material_id: MaterialId) -> AppResult<BalanceReconciliation> {
        let reconciliation = self.repository.reconcile_balance(material_id).await?;
        if !reconciliation.is_consistent() {
            tracing::error!(
                material_id = %material_id,
                cached_balance = %reconciliation.cached_balance,
                ledger_balance = %reconciliation.ledger_balance,
                "material balance diverged from its ledger"
            );
        }

        Ok(reconciliation)
    }

    async fn audit(
        &self,
        actor: &ActorContext,
        action: AuditAction,
        entity_name: &str,
        record_id: String,
        change: AppResult<AuditChange>,
    ) {
        match change {
            Ok(change) => {
                self.audit_recorder
                    .record(actor, action, entity_name, Some(record_id), change)
                    .await;
            }
            Err(error) => warn!(
                action = action.as_str(),
                entity_name,
                record_id = %record_id,
                error = %error,
                "failed to build audit payload"
            ),
        }
    }
}
