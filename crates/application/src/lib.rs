//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_log_service;
mod audit_ports;
mod audit_recorder;
mod ledger_ports;
mod reporting_ports;
mod reporting_service;
mod stock_ledger_service;

pub use audit_log_service::AuditLogService;
pub use audit_ports::{
    AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRecord, AuditRepository,
};
pub use audit_recorder::AuditRecorder;
pub use ledger_ports::{
    AppliedAdjustment, BalanceGuard, RegisteredMaterial, StockLedgerRepository, UsageRevision,
};
pub use reporting_ports::ReportRepository;
pub use reporting_service::ReportingService;
pub use stock_ledger_service::{
    LedgerPolicy, MATERIALS_ENTITY, PROJECT_MATERIAL_USAGES_ENTITY, STOCK_ADJUSTMENTS_ENTITY,
    StockLedgerService,
};
