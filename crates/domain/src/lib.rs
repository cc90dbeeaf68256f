//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod ids;
mod inventory;
mod report;

pub use audit::{AuditAction, AuditChange};
pub use ids::{AuditLogEntryId, EmployeeId, MaterialId, ProjectId, StockAdjustmentId, UsageId};
pub use inventory::{
    AdjustmentKind, BalanceReconciliation, Material, NewMaterial, NewProjectMaterialUsage,
    NewStockAdjustment, ProjectMaterialUsage, StockAdjustment, UsageUpdate, positive_quantity,
    storable_amount,
};
pub use report::{
    AlertTier, AlertTierPolicy, AttendanceRecord, AttendanceReportRow, AttendanceStatus,
    AttendanceSummary, BudgetAlertRow, ExpenseRecord, ExpenseStatus, PERCENTAGE_SCALE,
    ProjectBudgetSnapshot, ReportPeriod, attendance_report, budget_alert_report, percentage,
};
