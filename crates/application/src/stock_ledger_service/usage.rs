use tracing::info;

use santiye_core::{ActorContext, AppResult};
use santiye_domain::{
    AuditAction, AuditChange, NewProjectMaterialUsage, ProjectMaterialUsage, UsageId,
    UsageUpdate,
};

use super::{PROJECT_MATERIAL_USAGES_ENTITY, StockLedgerService};

impl StockLedgerService {
    /// Records material consumed by a project and decrements the material balance.
    ///
    /// Whether the balance may go negative follows [`super::LedgerPolicy`].
    pub async fn record_usage(
        &self,
        actor: &ActorContext,
        input: NewProjectMaterialUsage,
    ) -> AppResult<ProjectMaterialUsage> {
        let usage = self
            .repository
            .insert_usage(input, self.policy.usage_guard())
            .await?;

        info!(
            usage_id = %usage.id,
            project_id = %usage.project_id,
            material_id = %usage.material_id,
            quantity_used = %usage.quantity_used,
            "project material usage recorded"
        );

        self.audit(
            actor,
            AuditAction::Create,
            PROJECT_MATERIAL_USAGES_ENTITY,
            usage.id.to_string(),
            AuditChange::created(&usage),
        )
        .await;

        Ok(usage)
    }

    /// Replaces a usage's values and applies the quantity difference to the balance.
    pub async fn update_usage(
        &self,
        actor: &ActorContext,
        usage_id: UsageId,
        update: UsageUpdate,
    ) -> AppResult<ProjectMaterialUsage> {
        let revision = self
            .repository
            .update_usage(usage_id, update, self.policy.usage_guard())
            .await?;

        info!(
            usage_id = %usage_id,
            material_id = %revision.current.material_id,
            previous_quantity = %revision.previous.quantity_used,
            quantity_used = %revision.current.quantity_used,
            "project material usage updated"
        );

        self.audit(
            actor,
            AuditAction::Update,
            PROJECT_MATERIAL_USAGES_ENTITY,
            usage_id.to_string(),
            AuditChange::updated(&revision.previous, &revision.current),
        )
        .await;

        Ok(revision.current)
    }

    /// Returns a usage's quantity to the material balance and removes the record.
    pub async fn delete_usage(&self, actor: &ActorContext, usage_id: UsageId) -> AppResult<()> {
        let removed = self.repository.delete_usage(usage_id).await?;

        info!(
            usage_id = %usage_id,
            material_id = %removed.material_id,
            restored_quantity = %removed.quantity_used,
            "project material usage deleted"
        );

        self.audit(
            actor,
            AuditAction::Delete,
            PROJECT_MATERIAL_USAGES_ENTITY,
            usage_id.to_string(),
            AuditChange::deleted(&removed),
        )
        .await;

        Ok(())
    }
}
