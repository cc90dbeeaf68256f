use santiye_application::{AuditLogService, ReportingService, StockLedgerService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub stock_ledger_service: StockLedgerService,
    pub reporting_service: ReportingService,
    pub audit_log_service: AuditLogService,
    pub postgres_pool: PgPool,
}
