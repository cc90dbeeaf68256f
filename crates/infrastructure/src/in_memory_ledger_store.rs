use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use santiye_application::{
    AppliedAdjustment, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRecord,
    AuditRepository, BalanceGuard, RegisteredMaterial, ReportRepository, StockLedgerRepository,
    UsageRevision,
};
use santiye_core::{AppError, AppResult, NonEmptyString, UserId};
use santiye_domain::{
    AdjustmentKind, AttendanceRecord, AttendanceStatus, AttendanceSummary, AuditLogEntryId,
    BalanceReconciliation, EmployeeId, ExpenseRecord, Material, MaterialId, NewMaterial,
    NewProjectMaterialUsage, NewStockAdjustment, ProjectBudgetSnapshot, ProjectId,
    ProjectMaterialUsage, ReportPeriod, StockAdjustment, StockAdjustmentId, UsageId, UsageUpdate,
    storable_amount,
};

mod audit;
mod ledger;
mod reports;


const OPENING_BALANCE_DESCRIPTION: &str = "Açılış stoğu";

/// In-memory store implementing every ledger, audit and report port.
///
/// All state sits behind one mutex, so each port call is atomic with respect
/// to every other call. Used by tests and local runs without PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    state: Mutex<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    materials: HashMap<MaterialId, MaterialRecord>,
    adjustments: Vec<StockAdjustment>,
    usages: Vec<ProjectMaterialUsage>,
    projects: HashMap<ProjectId, ProjectRecord>,
    employees: HashMap<EmployeeId, EmployeeRecord>,
    attendance: Vec<AttendanceRecord>,
    expenses: Vec<ExpenseRecord>,
    audit_log: Vec<AuditLogEntry>,
}

#[derive(Debug, Clone)]
struct MaterialRecord {
    name: String,
    unit: String,
    unit_price: Decimal,
    stock_quantity: Decimal,
    minimum_stock: Decimal,
}

#[derive(Debug, Clone)]
struct ProjectRecord {
    name: String,
    budget: Decimal,
}

#[derive(Debug, Clone)]
struct EmployeeRecord {
    full_name: String,
    role: String,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a project that usages and expenses can reference.
    pub async fn add_project(&self, name: &str, budget: Decimal) -> AppResult<ProjectId> {
        let name = NonEmptyString::new(name)?;
        let project_id = ProjectId::new();
        self.state.lock().await.projects.insert(
            project_id,
            ProjectRecord {
                name: name.into(),
                budget,
            },
        );

        Ok(project_id)
    }

    /// Adds an employee that attendance rows can reference.
    pub async fn add_employee(&self, full_name: &str, role: &str) -> AppResult<EmployeeId> {
        let full_name = NonEmptyString::new(full_name)?;
        let employee_id = EmployeeId::new();
        self.state.lock().await.employees.insert(
            employee_id,
            EmployeeRecord {
                full_name: full_name.into(),
                role: role.trim().to_owned(),
            },
        );

        Ok(employee_id)
    }

    /// Records one attendance row, unique per employee, project and day.
    pub async fn add_attendance(&self, record: AttendanceRecord) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.employees.contains_key(&record.employee_id) {
            return Err(AppError::NotFound(format!(
                "employee '{}' does not exist",
                record.employee_id
            )));
        }
        if state.attendance.iter().any(|existing| {
            existing.employee_id == record.employee_id
                && existing.project_id == record.project_id
                && existing.date == record.date
        }) {
            return Err(AppError::Conflict(format!(
                "attendance for employee '{}' on {} already exists",
                record.employee_id, record.date
            )));
        }

        state.attendance.push(record);
        Ok(())
    }

    /// Records one expense.
    pub async fn add_expense(&self, record: ExpenseRecord) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(project_id) = record.project_id
            && !state.projects.contains_key(&project_id)
        {
            return Err(AppError::NotFound(format!(
                "project '{project_id}' does not exist"
            )));
        }

        state.expenses.push(record);
        Ok(())
    }
}

impl MaterialRecord {
    fn to_material(&self, material_id: MaterialId) -> AppResult<Material> {
        Material::new(
            material_id,
            self.name.as_str(),
            self.unit.as_str(),
            self.unit_price,
            self.stock_quantity,
            self.minimum_stock,
        )
    }
}

impl StoreState {
    /// Applies `delta` to a balance, honouring an optional coverage requirement.
    fn move_balance(
        &mut self,
        material_id: MaterialId,
        delta: Decimal,
        required: Option<Decimal>,
    ) -> AppResult<&MaterialRecord> {
        let record = self
            .materials
            .get_mut(&material_id)
            .ok_or_else(|| material_not_found(material_id))?;

        if let Some(required) = required
            && record.stock_quantity < required
        {
            return Err(AppError::InsufficientStock {
                material_id: material_id.as_uuid(),
                requested: required,
                available: record.stock_quantity,
            });
        }

        let balance = record
            .stock_quantity
            .checked_add(delta)
            .ok_or_else(|| {
                AppError::InvalidQuantity(format!(
                    "balance of material '{material_id}' cannot absorb a change of {delta}"
                ))
            })
            .and_then(|balance| storable_amount("balance", balance))?;
        record.stock_quantity = balance;
        Ok(record)
    }
}

fn required_balance(guard: BalanceGuard, delta: Decimal) -> Option<Decimal> {
    match guard {
        BalanceGuard::RejectNegative if delta < Decimal::ZERO => Some(-delta),
        _ => None,
    }
}

fn material_not_found(material_id: MaterialId) -> AppError {
    AppError::NotFound(format!("material '{material_id}' does not exist"))
}

fn usage_not_found(usage_id: UsageId) -> AppError {
    AppError::NotFound(format!("usage '{usage_id}' does not exist"))
}
