use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use santiye_core::{ActorContext, AppError, AppResult, RequestOrigin, UserId};
use santiye_domain::{
    AdjustmentKind, AuditAction, AuditChange, BalanceReconciliation, Material, MaterialId,
    NewMaterial, NewProjectMaterialUsage, NewStockAdjustment, ProjectId, ProjectMaterialUsage,
    StockAdjustment, StockAdjustmentId, UsageId, UsageUpdate,
};

use crate::{
    AppliedAdjustment, AuditRecord, AuditRecorder, AuditRepository, BalanceGuard,
    RegisteredMaterial, StockLedgerRepository, UsageRevision,
};

use super::{LedgerPolicy, StockLedgerService};

#[derive(Default)]
struct FakeLedgerState {
    materials: HashMap<MaterialId, Material>,
    adjustments: Vec<StockAdjustment>,
    usages: HashMap<UsageId, ProjectMaterialUsage>,
    guards: Vec<BalanceGuard>,
    calls: usize,
}

#[derive(Default)]
struct FakeLedgerRepository {
    state: Mutex<FakeLedgerState>,
}

impl FakeLedgerRepository {
    async fn seed_material(&self, balance: i64) -> MaterialId {
        let material_id = MaterialId::new();
        let material = Material::new(
            material_id,
            "Nervürlü Demir",
            "ton",
            Decimal::from(24_000),
            Decimal::from(balance),
            Decimal::ONE,
        );
        if let Ok(material) = material {
            self.state
                .lock()
                .await
                .materials
                .insert(material_id, material);
        }
        material_id
    }

    async fn balance(&self, material_id: MaterialId) -> Decimal {
        self.state
            .lock()
            .await
            .materials
            .get(&material_id)
            .map(Material::stock_quantity)
            .unwrap_or_default()
    }
}

fn with_balance(material: &Material, balance: Decimal) -> AppResult<Material> {
    Material::new(
        material.id(),
        material.name().as_str(),
        material.unit().as_str(),
        material.unit_price(),
        balance,
        material.minimum_stock(),
    )
}

fn move_balance(
    state: &mut FakeLedgerState,
    material_id: MaterialId,
    delta: Decimal,
    guard: BalanceGuard,
) -> AppResult<Decimal> {
    let material = state
        .materials
        .get(&material_id)
        .ok_or_else(|| AppError::NotFound(format!("material '{material_id}' does not exist")))?;
    let next = material.stock_quantity() + delta;
    if guard == BalanceGuard::RejectNegative && next < Decimal::ZERO {
        return Err(AppError::InsufficientStock {
            material_id: material_id.as_uuid(),
            requested: -delta,
            available: material.stock_quantity(),
        });
    }
    let updated = with_balance(material, next)?;
    state.materials.insert(material_id, updated);
    Ok(next)
}

#[async_trait]
impl StockLedgerRepository for FakeLedgerRepository {
    async fn create_material(
        &self,
        input: NewMaterial,
        actor_id: UserId,
    ) -> AppResult<RegisteredMaterial> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let material_id = MaterialId::new();
        let opening = input.opening_stock.unwrap_or_default();
        let material = Material::new(
            material_id,
            input.name,
            input.unit,
            input.unit_price,
            opening,
            input.minimum_stock,
        )?;
        let opening_adjustment = input.opening_stock.map(|quantity| StockAdjustment {
            id: StockAdjustmentId::new(),
            material_id,
            quantity,
            kind: AdjustmentKind::In,
            description: Some("opening balance".to_owned()),
            actor_id,
            created_at: Utc::now(),
        });
        state.materials.insert(material_id, material.clone());
        Ok(RegisteredMaterial {
            material,
            opening_adjustment,
        })
    }

    async fn find_material(&self, material_id: MaterialId) -> AppResult<Option<Material>> {
        Ok(self.state.lock().await.materials.get(&material_id).cloned())
    }

    async fn list_low_stock_materials(&self) -> AppResult<Vec<Material>> {
        Ok(Vec::new())
    }

    async fn apply_adjustment(&self, input: NewStockAdjustment) -> AppResult<AppliedAdjustment> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let available = state
            .materials
            .get(&input.material_id)
            .map(Material::stock_quantity)
            .ok_or_else(|| AppError::NotFound("material".to_owned()))?;
        if input.kind.requires_available_stock() && input.quantity > available {
            return Err(AppError::InsufficientStock {
                material_id: input.material_id.as_uuid(),
                requested: input.quantity,
                available,
            });
        }
        let balance_after = move_balance(
            &mut state,
            input.material_id,
            input.kind.signed_delta(input.quantity),
            BalanceGuard::AllowOverdraw,
        )?;
        let adjustment = StockAdjustment {
            id: StockAdjustmentId::new(),
            material_id: input.material_id,
            quantity: input.quantity,
            kind: input.kind,
            description: input.description,
            actor_id: input.actor_id,
            created_at: Utc::now(),
        };
        state.adjustments.push(adjustment.clone());
        Ok(AppliedAdjustment {
            adjustment,
            balance_after,
        })
    }

    async fn list_adjustments(&self, material_id: MaterialId) -> AppResult<Vec<StockAdjustment>> {
        Ok(self
            .state
            .lock()
            .await
            .adjustments
            .iter()
            .filter(|adjustment| adjustment.material_id == material_id)
            .cloned()
            .collect())
    }

    async fn insert_usage(
        &self,
        input: NewProjectMaterialUsage,
        guard: BalanceGuard,
    ) -> AppResult<ProjectMaterialUsage> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        state.guards.push(guard);
        move_balance(&mut state, input.material_id, -input.quantity_used, guard)?;
        let usage = ProjectMaterialUsage {
            id: UsageId::new(),
            project_id: input.project_id,
            material_id: input.material_id,
            quantity_used: input.quantity_used,
            unit_price_at_time: input.unit_price_at_time.unwrap_or_default(),
            date_used: input.date_used,
        };
        state.usages.insert(usage.id, usage.clone());
        Ok(usage)
    }

    async fn update_usage(
        &self,
        usage_id: UsageId,
        update: UsageUpdate,
        guard: BalanceGuard,
    ) -> AppResult<UsageRevision> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        state.guards.push(guard);
        let previous = state
            .usages
            .get(&usage_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("usage '{usage_id}' does not exist")))?;
        move_balance(
            &mut state,
            previous.material_id,
            update.balance_delta(&previous),
            guard,
        )?;
        let current = update.apply_to(&previous);
        state.usages.insert(usage_id, current.clone());
        Ok(UsageRevision { previous, current })
    }

    async fn delete_usage(&self, usage_id: UsageId) -> AppResult<ProjectMaterialUsage> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let removed = state
            .usages
            .remove(&usage_id)
            .ok_or_else(|| AppError::NotFound(format!("usage '{usage_id}' does not exist")))?;
        move_balance(
            &mut state,
            removed.material_id,
            removed.quantity_used,
            BalanceGuard::AllowOverdraw,
        )?;
        Ok(removed)
    }

    async fn list_project_usages(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectMaterialUsage>> {
        Ok(self
            .state
            .lock()
            .await
            .usages
            .values()
            .filter(|usage| usage.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn reconcile_balance(
        &self,
        material_id: MaterialId,
    ) -> AppResult<BalanceReconciliation> {
        let state = self.state.lock().await;
        let cached_balance = state
            .materials
            .get(&material_id)
            .map(Material::stock_quantity)
            .unwrap_or_default();
        Ok(BalanceReconciliation {
            material_id,
            cached_balance,
            ledger_balance: cached_balance + Decimal::ONE,
        })
    }
}

#[derive(Default)]
struct FakeAuditRepository {
    records: Mutex<Vec<AuditRecord>>,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_entry(&self, record: AuditRecord) -> AppResult<()> {
        self.records.lock().await.push(record);
        Ok(())
    }
}

struct UnavailableAuditRepository;

#[async_trait]
impl AuditRepository for UnavailableAuditRepository {
    async fn append_entry(&self, _record: AuditRecord) -> AppResult<()> {
        Err(AppError::StoreUnavailable("audit store offline".to_owned()))
    }
}

fn actor() -> ActorContext {
    ActorContext::new(UserId::new(), "Depo Sorumlusu", RequestOrigin::default())
}

fn service(
    policy: LedgerPolicy,
) -> (
    StockLedgerService,
    Arc<FakeLedgerRepository>,
    Arc<FakeAuditRepository>,
) {
    let repository = Arc::new(FakeLedgerRepository::default());
    let audit_repository = Arc::new(FakeAuditRepository::default());
    let service = StockLedgerService::new(
        repository.clone(),
        AuditRecorder::new(audit_repository.clone()),
        policy,
    );
    (service, repository, audit_repository)
}

fn usage_input(material_id: MaterialId, quantity: i64) -> AppResult<NewProjectMaterialUsage> {
    NewProjectMaterialUsage::new(
        ProjectId::new(),
        material_id,
        Decimal::from(quantity),
        Some(Decimal::from(24_000)),
        NaiveDate::from_ymd_opt(2025, 12, 8).unwrap_or_default(),
    )
}

#[tokio::test]
async fn outbound_adjustment_beyond_balance_is_rejected_without_audit() {
    let (service, repository, audit_repository) = service(LedgerPolicy::default());
    let material_id = repository.seed_material(5).await;

    let result = service
        .apply_adjustment(
            &actor(),
            material_id,
            AdjustmentKind::Out,
            Decimal::from(6),
            Some("şantiyeye sevk".to_owned()),
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::InsufficientStock { requested, available, .. })
            if requested == Decimal::from(6) && available == Decimal::from(5)
    ));
    assert_eq!(repository.balance(material_id).await, Decimal::from(5));
    assert!(repository.state.lock().await.adjustments.is_empty());
    assert!(audit_repository.records.lock().await.is_empty());
}

#[tokio::test]
async fn committed_adjustment_writes_one_transaction_audit_entry() {
    let (service, repository, audit_repository) = service(LedgerPolicy::default());
    let material_id = repository.seed_material(5).await;

    let adjustment = service
        .apply_adjustment(
            &actor(),
            material_id,
            AdjustmentKind::In,
            Decimal::from(20),
            None,
        )
        .await;

    assert!(adjustment.is_ok());
    let Ok(adjustment) = adjustment else {
        return;
    };
    assert_eq!(repository.balance(material_id).await, Decimal::from(25));

    let records = audit_repository.records.lock().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action, AuditAction::Transaction);
    assert_eq!(records[0].entity_name, "stock_adjustments");
    assert_eq!(records[0].record_id, Some(adjustment.id.to_string()));
    assert!(matches!(records[0].change, AuditChange::Created { .. }));
}

#[tokio::test]
async fn zero_quantity_never_reaches_the_store() {
    let (service, repository, audit_repository) = service(LedgerPolicy::default());
    let material_id = repository.seed_material(5).await;

    let result = service
        .apply_adjustment(&actor(), material_id, AdjustmentKind::In, Decimal::ZERO, None)
        .await;

    assert!(matches!(result, Err(AppError::InvalidQuantity(_))));
    assert_eq!(repository.state.lock().await.calls, 0);
    assert!(audit_repository.records.lock().await.is_empty());
}

#[tokio::test]
async fn audit_outage_does_not_fail_the_mutation() {
    let repository = Arc::new(FakeLedgerRepository::default());
    let material_id = repository.seed_material(10).await;
    let service = StockLedgerService::new(
        repository.clone(),
        AuditRecorder::new(Arc::new(UnavailableAuditRepository)),
        LedgerPolicy::default(),
    );

    let result = service
        .apply_adjustment(&actor(), material_id, AdjustmentKind::Out, Decimal::from(4), None)
        .await;

    assert!(result.is_ok());
    assert_eq!(repository.balance(material_id).await, Decimal::from(6));
}

#[tokio::test]
async fn usage_overdraw_follows_policy() {
    let (lenient, lenient_repository, _) = service(LedgerPolicy::default());
    let material_id = lenient_repository.seed_material(3).await;
    let Ok(input) = usage_input(material_id, 5) else {
        panic!("usage input should be valid");
    };

    let recorded = lenient.record_usage(&actor(), input.clone()).await;
    assert!(recorded.is_ok());
    assert_eq!(lenient_repository.balance(material_id).await, Decimal::from(-2));
    assert_eq!(
        lenient_repository.state.lock().await.guards,
        vec![BalanceGuard::AllowOverdraw]
    );

    let (strict, strict_repository, strict_audit) = service(LedgerPolicy {
        enforce_non_negative_on_usage: true,
    });
    let strict_material_id = strict_repository.seed_material(3).await;
    let Ok(strict_input) = usage_input(strict_material_id, 5) else {
        panic!("usage input should be valid");
    };

    let rejected = strict.record_usage(&actor(), strict_input).await;
    assert!(matches!(rejected, Err(AppError::InsufficientStock { .. })));
    assert_eq!(strict_repository.balance(strict_material_id).await, Decimal::from(3));
    assert!(strict_audit.records.lock().await.is_empty());
}

#[tokio::test]
async fn usage_update_and_delete_are_audited_with_snapshots() {
    let (service, repository, audit_repository) = service(LedgerPolicy::default());
    let material_id = repository.seed_material(100).await;
    let actor = actor();
    let Ok(input) = usage_input(material_id, 8) else {
        panic!("usage input should be valid");
    };

    let Ok(usage) = service.record_usage(&actor, input).await else {
        panic!("usage should be recorded");
    };
    let Ok(update) = UsageUpdate::new(Decimal::from(5), None, None) else {
        panic!("update should be valid");
    };
    let updated = service.update_usage(&actor, usage.id, update).await;
    assert!(updated.is_ok());
    assert_eq!(repository.balance(material_id).await, Decimal::from(95));

    let deleted = service.delete_usage(&actor, usage.id).await;
    assert!(deleted.is_ok());
    assert_eq!(repository.balance(material_id).await, Decimal::from(100));

    let records = audit_repository.records.lock().await;
    let actions: Vec<AuditAction> = records.iter().map(|record| record.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Create, AuditAction::Update, AuditAction::Delete]
    );
    assert!(
        records
            .iter()
            .all(|record| record.record_id == Some(usage.id.to_string()))
    );
    assert_eq!(records[1].change.changed_fields(), vec!["quantity_used"]);
    assert!(matches!(records[2].change, AuditChange::Deleted { .. }));
}

#[tokio::test]
async fn deleting_missing_usage_is_not_found_and_not_audited() {
    let (service, _, audit_repository) = service(LedgerPolicy::default());

    let result = service.delete_usage(&actor(), UsageId::new()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(audit_repository.records.lock().await.is_empty());
}

#[tokio::test]
async fn registration_with_opening_stock_audits_material_and_entry() {
    let (service, _, audit_repository) = service(LedgerPolicy::default());

    let material = service
        .register_material(
            &actor(),
            NewMaterial {
                name: "Hazır Beton C30".to_owned(),
                unit: "m3".to_owned(),
                unit_price: Decimal::from(2_850),
                minimum_stock: Decimal::from(10),
                opening_stock: Some(Decimal::from(40)),
            },
        )
        .await;

    assert!(material.is_ok());
    let records = audit_repository.records.lock().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].action, AuditAction::Create);
    assert_eq!(records[0].entity_name, "materials");
    assert_eq!(records[1].action, AuditAction::Transaction);
    assert_eq!(records[1].entity_name, "stock_adjustments");
}

#[tokio::test]
async fn registration_rejects_negative_opening_stock() {
    let (service, repository, _) = service(LedgerPolicy::default());

    let result = service
        .register_material(
            &actor(),
            NewMaterial {
                name: "Kum".to_owned(),
                unit: "ton".to_owned(),
                unit_price: Decimal::from(450),
                minimum_stock: Decimal::ZERO,
                opening_stock: Some(Decimal::NEGATIVE_ONE),
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::InvalidQuantity(_))));
    assert_eq!(repository.state.lock().await.calls, 0);
}

#[tokio::test]
async fn registration_rejects_amounts_the_ledger_cannot_store() {
    let (service, repository, _) = service(LedgerPolicy::default());

    for (unit_price, opening_stock) in [
        (Decimal::new(245_000_001, 5), None),
        (Decimal::from(450), Some(Decimal::new(6, 5))),
        (Decimal::from(450), Some(Decimal::from(100_000_000_000_000_i64))),
    ] {
        let result = service
            .register_material(
                &actor(),
                NewMaterial {
                    name: "Kireç".to_owned(),
                    unit: "kg".to_owned(),
                    unit_price,
                    minimum_stock: Decimal::ZERO,
                    opening_stock,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidQuantity(_))));
    }
    assert_eq!(repository.state.lock().await.calls, 0);
}

#[tokio::test]
async fn listing_adjustments_of_unknown_material_is_not_found() {
    let (service, _, _) = service(LedgerPolicy::default());

    let result = service.list_adjustments(MaterialId::new()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn verify_balance_reports_divergence() {
    let (service, repository, _) = service(LedgerPolicy::default());
    let material_id = repository.seed_material(7).await;

    let reconciliation = service.verify_balance(material_id).await;

    assert!(reconciliation.is_ok_and(|reconciliation| !reconciliation.is_consistent()));
}
