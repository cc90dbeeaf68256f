mod audit;
mod common;
mod materials;
mod reports;
mod usages;

pub use audit::AuditLogEntryResponse;
pub use common::{HealthDependencyStatus, HealthResponse};
pub use materials::{
    ApplyAdjustmentRequest, BalanceReconciliationResponse, MaterialResponse,
    RegisterMaterialRequest, StockAdjustmentResponse,
};
pub use reports::{AttendanceReportRowResponse, BudgetAlertRowResponse};
pub use usages::{RecordUsageRequest, UpdateUsageRequest, UsageResponse};

pub(crate) use common::{parse_amount, parse_identifier, parse_quantity};
