use std::sync::Arc;

use santiye_application::{AuditLogService, AuditRecorder, ReportingService, StockLedgerService};
use santiye_infrastructure::{
    PostgresAuditLogRepository, PostgresAuditRepository, PostgresReportRepository,
    PostgresStockLedgerRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let audit_recorder = AuditRecorder::new(Arc::new(PostgresAuditRepository::new(pool.clone())));

    let stock_ledger_service = StockLedgerService::new(
        Arc::new(PostgresStockLedgerRepository::new(pool.clone())),
        audit_recorder,
        config.ledger_policy,
    );
    let reporting_service = ReportingService::new(
        Arc::new(PostgresReportRepository::new(pool.clone())),
        config.alert_tier_policy.clone(),
    );
    let audit_log_service =
        AuditLogService::new(Arc::new(PostgresAuditLogRepository::new(pool.clone())));

    AppState {
        stock_ledger_service,
        reporting_service,
        audit_log_service,
        postgres_pool: pool,
    }
}
