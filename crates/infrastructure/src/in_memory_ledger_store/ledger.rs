use super::*;

#[async_trait]
impl StockLedgerRepository for InMemoryLedgerStore {
    async fn create_material(
        &self,
        input: NewMaterial,
        actor_id: UserId,
    ) -> AppResult<RegisteredMaterial> {
        input.check_storable()?;
        let material_id = MaterialId::new();
        let record = MaterialRecord {
            name: input.name.trim().to_owned(),
            unit: input.unit.trim().to_owned(),
            unit_price: input.unit_price,
            stock_quantity: input.opening_stock.unwrap_or(Decimal::ZERO),
            minimum_stock: input.minimum_stock,
        };
        let material = record.to_material(material_id)?;

        let opening_adjustment = input.opening_stock.map(|quantity| StockAdjustment {
            id: StockAdjustmentId::new(),
            material_id,
            quantity,
            kind: AdjustmentKind::In,
            description: Some(OPENING_BALANCE_DESCRIPTION.to_owned()),
            actor_id,
            created_at: Utc::now(),
        });

        let mut state = self.state.lock().await;
        state.materials.insert(material_id, record);
        if let Some(adjustment) = &opening_adjustment {
            state.adjustments.push(adjustment.clone());
        }

        Ok(RegisteredMaterial {
            material,
            opening_adjustment,
        })
    }

    async fn find_material(&self, material_id: MaterialId) -> AppResult<Option<Material>> {
        self.state
            .lock()
            .await
            .materials
            .get(&material_id)
            .map(|record| record.to_material(material_id))
            .transpose()
    }

    async fn list_low_stock_materials(&self) -> AppResult<Vec<Material>> {
        let state = self.state.lock().await;
        let mut materials = state
            .materials
            .iter()
            .filter(|(_, record)| record.stock_quantity < record.minimum_stock)
            .map(|(material_id, record)| record.to_material(*material_id))
            .collect::<AppResult<Vec<_>>>()?;
        materials.sort_by(|left, right| {
            left.name()
                .as_str()
                .cmp(right.name().as_str())
                .then_with(|| left.id().cmp(&right.id()))
        });

        Ok(materials)
    }

    async fn apply_adjustment(&self, input: NewStockAdjustment) -> AppResult<AppliedAdjustment> {
        input.check_storable()?;
        let mut state = self.state.lock().await;
        let required = input
            .kind
            .requires_available_stock()
            .then_some(input.quantity);
        let balance_after = state
            .move_balance(
                input.material_id,
                input.kind.signed_delta(input.quantity),
                required,
            )?
            .stock_quantity;

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
        input.check_storable()?;
        let mut state = self.state.lock().await;
        if !state.projects.contains_key(&input.project_id) {
            return Err(AppError::NotFound(format!(
                "project '{}' does not exist",
                input.project_id
            )));
        }

        let delta = -input.quantity_used;
        let catalog_price = state
            .move_balance(input.material_id, delta, required_balance(guard, delta))?
            .unit_price;

        let usage = ProjectMaterialUsage {
            id: UsageId::new(),
            project_id: input.project_id,
            material_id: input.material_id,
            quantity_used: input.quantity_used,
            unit_price_at_time: input.unit_price_at_time.unwrap_or(catalog_price),
            date_used: input.date_used,
        };
        state.usages.push(usage.clone());

        Ok(usage)
    }

    async fn update_usage(
        &self,
        usage_id: UsageId,
        update: UsageUpdate,
        guard: BalanceGuard,
    ) -> AppResult<UsageRevision> {
        update.check_storable()?;
        let mut state = self.state.lock().await;
        let position = state
            .usages
            .iter()
            .position(|usage| usage.id == usage_id)
            .ok_or_else(|| usage_not_found(usage_id))?;
        let previous = state.usages[position].clone();

        let delta = update.balance_delta(&previous);
        if !delta.is_zero() {
            state.move_balance(previous.material_id, delta, required_balance(guard, delta))?;
        }

        let current = update.apply_to(&previous);
        state.usages[position] = current.clone();

        Ok(UsageRevision { previous, current })
    }

    async fn delete_usage(&self, usage_id: UsageId) -> AppResult<ProjectMaterialUsage> {
        let mut state = self.state.lock().await;
        let position = state
            .usages
            .iter()
            .position(|usage| usage.id == usage_id)
            .ok_or_else(|| usage_not_found(usage_id))?;

        let material_id = state.usages[position].material_id;
        let quantity_used = state.usages[position].quantity_used;
        state.move_balance(material_id, quantity_used, None)?;

        Ok(state.usages.remove(position))
    }

    async fn list_project_usages(
        &self,
        project_id: ProjectId,
    ) -> AppResult<Vec<ProjectMaterialUsage>> {
        let mut usages: Vec<ProjectMaterialUsage> = self
            .state
            .lock()
            .await
            .usages
            .iter()
            .filter(|usage| usage.project_id == project_id)
            .cloned()
            .collect();
        usages.sort_by_key(|usage| usage.date_used);

        Ok(usages)
    }

    async fn reconcile_balance(
        &self,
        material_id: MaterialId,
    ) -> AppResult<BalanceReconciliation> {
        let state = self.state.lock().await;
        let cached_balance = state
            .materials
            .get(&material_id)
            .map(|record| record.stock_quantity)
            .ok_or_else(|| material_not_found(material_id))?;

        let adjusted: Decimal = state
            .adjustments
            .iter()
            .filter(|adjustment| adjustment.material_id == material_id)
            .map(StockAdjustment::signed_delta)
            .sum();
        let consumed: Decimal = state
            .usages
            .iter()
            .filter(|usage| usage.material_id == material_id)
            .map(|usage| usage.quantity_used)
            .sum();

        Ok(BalanceReconciliation {
            material_id,
            cached_balance,
            ledger_balance: adjusted - consumed,
        })
    }
}
