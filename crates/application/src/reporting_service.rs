use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use santiye_core::{AppError, AppResult};
use santiye_domain::{
    AlertTierPolicy, AttendanceReportRow, BudgetAlertRow, ReportPeriod, attendance_report,
    budget_alert_report,
};

use crate::ReportRepository;


/// Read-only service computing attendance and budget reports on demand.
#[derive(Clone)]
pub struct ReportingService {
    repository: Arc<dyn ReportRepository>,
    tier_policy: AlertTierPolicy,
}

impl ReportingService {
    /// Creates a service over a report store with the given alert tiers.
    #[must_use]
    pub fn new(repository: Arc<dyn ReportRepository>, tier_policy: AlertTierPolicy) -> Self {
        Self {
            repository,
            tier_policy,
        }
    }

    /// Builds the attendance report for one calendar month.
    pub async fn attendance_report(
        &self,
        year: i32,
        month: u32,
    ) -> AppResult<Vec<AttendanceReportRow>> {
        let period = ReportPeriod::new(year, month)?;
        let summaries = self.repository.attendance_summaries(period).await?;
        let rows = attendance_report(summaries);

        debug!(year, month, rows = rows.len(), "attendance report computed");
        Ok(rows)
    }

    /// Builds the budget alert report for projects at or above the threshold.
    pub async fn budget_alert_report(
        &self,
        threshold_percentage: Decimal,
    ) -> AppResult<Vec<BudgetAlertRow>> {
        if threshold_percentage < Decimal::ZERO {
            return Err(AppError::Validation(format!(
                "threshold percentage must not be negative, got {threshold_percentage}"
            )));
        }

        let snapshots = self.repository.project_budget_snapshots().await?;
        let rows = budget_alert_report(snapshots, threshold_percentage, &self.tier_policy);

        debug!(
            threshold = %threshold_percentage,
            rows = rows.len(),
            "budget alert report computed"
        );
        Ok(rows)
    }
}
