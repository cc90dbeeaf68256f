//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_ledger_store;
mod postgres_audit_log_repository;
mod postgres_audit_repository;
mod postgres_report_repository;
mod postgres_stock_ledger_repository;
mod store_error;

#[cfg(test)]
mod test_support;

pub use in_memory_ledger_store::InMemoryLedgerStore;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_report_repository::PostgresReportRepository;
pub use postgres_stock_ledger_repository::PostgresStockLedgerRepository;
