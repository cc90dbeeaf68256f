use async_trait::async_trait;

use santiye_core::AppResult;
use santiye_domain::{AttendanceSummary, ProjectBudgetSnapshot, ReportPeriod};

/// Read-only aggregation port over attendance and expense history.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Aggregates attendance rows dated inside the period, one summary per
    /// employee that has at least one such row.
    async fn attendance_summaries(&self, period: ReportPeriod)
    -> AppResult<Vec<AttendanceSummary>>;

    /// Returns every project's budget with the sum of its expense amounts.
    async fn project_budget_snapshots(&self) -> AppResult<Vec<ProjectBudgetSnapshot>>;
}
