//! Derived reporting rules shared by every store implementation.
//!
//! Stores only aggregate raw counts and sums; rates, tiers, filtering and
//! ordering are decided here so every backend produces identical rows.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use santiye_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{EmployeeId, ProjectId};

/// Number of decimal places carried by every reported percentage.
pub const PERCENTAGE_SCALE: u32 = 2;

/// Returns `numerator / denominator * 100` rounded half away from zero to two places.
///
/// Returns `None` when the denominator is zero.
#[must_use]
pub fn percentage(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }

    let ratio = numerator.checked_mul(Decimal::ONE_HUNDRED)?.checked_div(denominator)?;
    let mut rounded =
        ratio.round_dp_with_strategy(PERCENTAGE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PERCENTAGE_SCALE);
    Some(rounded)
}

/// Daily attendance outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Worked the day.
    Present,
    /// Missed the day without leave.
    Absent,
    /// Missed the day with approved leave.
    Excused,
    /// Missed the day on sick leave.
    SickLeave,
}

impl AttendanceStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Excused => "Excused",
            Self::SickLeave => "SickLeave",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Present" => Ok(Self::Present),
            "Absent" => Ok(Self::Absent),
            "Excused" => Ok(Self::Excused),
            "SickLeave" => Ok(Self::SickLeave),
            _ => Err(AppError::Validation(format!(
                "unknown attendance status '{value}'"
            ))),
        }
    }
}

/// Calendar month a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportPeriod {
    year: i32,
    month: u32,
}

impl ReportPeriod {
    /// Creates a validated period.
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(1900..=9999).contains(&year) {
            return Err(AppError::Validation(format!(
                "year must be between 1900 and 9999, got {year}"
            )));
        }

        Ok(Self { year, month })
    }

    /// Returns the calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the calendar month (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns true when `date` falls inside this month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// One employee's attendance for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Employee the row belongs to.
    pub employee_id: EmployeeId,
    /// Site worked at, if any.
    pub project_id: Option<ProjectId>,
    /// Calendar day.
    pub date: NaiveDate,
    /// Outcome of the day.
    pub status: AttendanceStatus,
    /// Regular hours worked.
    pub worked_hours: Decimal,
    /// Overtime hours worked.
    pub overtime_hours: Decimal,
}

/// Approval state of an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseStatus {
    /// Awaiting approval.
    Pending,
    /// Approved for payment.
    Approved,
    /// Paid out.
    Paid,
    /// Refused.
    Rejected,
}

impl ExpenseStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Paid => "Paid",
            Self::Rejected => "Rejected",
        }
    }
}

impl FromStr for ExpenseStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Paid" => Ok(Self::Paid),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown expense status '{value}'"
            ))),
        }
    }
}

/// Money spent, charged to a project or to general overhead.
///
/// Every expense counts toward its project's spend regardless of status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Charged project; `None` for general overhead.
    pub project_id: Option<ProjectId>,
    /// Free-form category label.
    pub category: String,
    /// Amount spent.
    pub amount: Decimal,
    /// Day of the expense.
    pub date: NaiveDate,
    /// Approval state.
    pub status: ExpenseStatus,
}

/// Per-employee attendance aggregate for one period, as produced by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Employee display name.
    pub employee_name: String,
    /// Employee role label.
    pub role: String,
    /// Attendance rows in the period.
    pub total_days: i64,
    /// Rows with status `Present`.
    pub present_days: i64,
    /// Rows with status `Absent`.
    pub absent_days: i64,
    /// Rows with status `Excused`.
    pub excused_days: i64,
    /// Rows with status `SickLeave`.
    pub sick_leave_days: i64,
    /// Sum of worked hours.
    pub total_worked_hours: Decimal,
    /// Sum of overtime hours.
    pub total_overtime_hours: Decimal,
}

/// One row of the monthly attendance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReportRow {
    /// Employee identifier.
    pub employee_id: EmployeeId,
    /// Employee display name.
    pub employee_name: String,
    /// Employee role label.
    pub role: String,
    /// Attendance rows in the period.
    pub total_days: i64,
    /// Present days.
    pub present_days: i64,
    /// Absent days.
    pub absent_days: i64,
    /// Excused days.
    pub excused_days: i64,
    /// Sick leave days.
    pub sick_leave_days: i64,
    /// Sum of worked hours.
    pub total_worked_hours: Decimal,
    /// Sum of overtime hours.
    pub total_overtime_hours: Decimal,
    /// Present over recorded days as a two-decimal percentage.
    pub attendance_rate: Option<Decimal>,
}

impl From<AttendanceSummary> for AttendanceReportRow {
    fn from(value: AttendanceSummary) -> Self {
        let attendance_rate = percentage(
            Decimal::from(value.present_days),
            Decimal::from(value.total_days),
        );

        Self {
            employee_id: value.employee_id,
            employee_name: value.employee_name,
            role: value.role,
            total_days: value.total_days,
            present_days: value.present_days,
            absent_days: value.absent_days,
            excused_days: value.excused_days,
            sick_leave_days: value.sick_leave_days,
            total_worked_hours: value.total_worked_hours,
            total_overtime_hours: value.total_overtime_hours,
            attendance_rate,
        }
    }
}

/// Builds the attendance report from store aggregates.
///
/// Employees without rows in the period are dropped. Rows are ordered by rate
/// descending (undefined rates last), then name, then employee id.
#[must_use]
pub fn attendance_report(summaries: Vec<AttendanceSummary>) -> Vec<AttendanceReportRow> {
    let mut rows: Vec<AttendanceReportRow> = summaries
        .into_iter()
        .filter(|summary| summary.total_days > 0)
        .map(AttendanceReportRow::from)
        .collect();

    rows.sort_by(|left, right| {
        descending_nulls_last(left.attendance_rate, right.attendance_rate)
            .then_with(|| left.employee_name.cmp(&right.employee_name))
            .then_with(|| left.employee_id.cmp(&right.employee_id))
    });
    rows
}

fn descending_nulls_last(left: Option<Decimal>, right: Option<Decimal>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One named budget severity bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTier {
    /// Lowest usage percentage (inclusive) that falls into this tier.
    pub min_percentage: Decimal,
    /// Label reported for the tier.
    pub label: String,
}

/// Ordered tier table mapping budget usage to an alert label.
///
/// Tiers are evaluated highest threshold first and the first qualifying tier
/// wins. The lowest tier must start at or below zero so every usage maps to a
/// label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTierPolicy {
    tiers: Vec<AlertTier>,
}

impl AlertTierPolicy {
    /// Creates a policy from tiers in any order.
    pub fn new(mut tiers: Vec<AlertTier>) -> AppResult<Self> {
        if tiers.is_empty() {
            return Err(AppError::Validation(
                "alert tier policy needs at least one tier".to_owned(),
            ));
        }
        if tiers.iter().any(|tier| tier.label.trim().is_empty()) {
            return Err(AppError::Validation(
                "alert tier labels must not be empty".to_owned(),
            ));
        }

        tiers.sort_by(|left, right| right.min_percentage.cmp(&left.min_percentage));
        if tiers
            .windows(2)
            .any(|pair| pair[0].min_percentage == pair[1].min_percentage)
        {
            return Err(AppError::Validation(
                "alert tier thresholds must be unique".to_owned(),
            ));
        }
        if tiers
            .last()
            .is_some_and(|floor| floor.min_percentage > Decimal::ZERO)
        {
            return Err(AppError::Validation(
                "lowest alert tier must start at or below 0".to_owned(),
            ));
        }

        Ok(Self { tiers })
    }

    /// Four-level scheme: KRİTİK ≥ 90, YÜKSEK ≥ 75, ORTA ≥ 50, otherwise DÜŞÜK.
    #[must_use]
    pub fn four_tier() -> Self {
        Self {
            tiers: vec![
                tier(90, "KRİTİK"),
                tier(75, "YÜKSEK"),
                tier(50, "ORTA"),
                tier(0, "DÜŞÜK"),
            ],
        }
    }

    /// Three-level scheme: Kritik ≥ 100, Uyarı ≥ 80, otherwise Normal.
    #[must_use]
    pub fn three_tier() -> Self {
        Self {
            tiers: vec![tier(100, "Kritik"), tier(80, "Uyarı"), tier(0, "Normal")],
        }
    }

    /// Returns tiers ordered highest threshold first.
    #[must_use]
    pub fn tiers(&self) -> &[AlertTier] {
        &self.tiers
    }

    /// Returns the label of the highest tier whose threshold `usage` reaches.
    #[must_use]
    pub fn level_for(&self, usage: Decimal) -> &str {
        self.tiers
            .iter()
            .find(|tier| usage >= tier.min_percentage)
            .or_else(|| self.tiers.last())
            .map(|tier| tier.label.as_str())
            .unwrap_or_default()
    }
}

impl Default for AlertTierPolicy {
    fn default() -> Self {
        Self::four_tier()
    }
}

impl FromStr for AlertTierPolicy {
    type Err = AppError;

    /// Parses `min:label` pairs separated by commas, e.g. `90:KRİTİK,0:DÜŞÜK`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let tiers = value
            .split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| {
                let (threshold, label) = entry.split_once(':').ok_or_else(|| {
                    AppError::Validation(format!("alert tier '{entry}' must be 'min:label'"))
                })?;
                let min_percentage = Decimal::from_str(threshold.trim()).map_err(|error| {
                    AppError::Validation(format!(
                        "invalid alert tier threshold '{threshold}': {error}"
                    ))
                })?;

                Ok(AlertTier {
                    min_percentage,
                    label: label.trim().to_owned(),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Self::new(tiers)
    }
}

fn tier(min_percentage: i64, label: &str) -> AlertTier {
    AlertTier {
        min_percentage: Decimal::from(min_percentage),
        label: label.to_owned(),
    }
}

/// Budget and cumulative spend of one project, as produced by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectBudgetSnapshot {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Project display name.
    pub project_name: String,
    /// Approved budget.
    pub budget: Decimal,
    /// Sum of the project's expense amounts, zero when it has none.
    pub total_expenses: Decimal,
}

/// One row of the budget alert report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAlertRow {
    /// Project identifier.
    pub project_id: ProjectId,
    /// Project display name.
    pub project_name: String,
    /// Approved budget.
    pub budget: Decimal,
    /// Cumulative spend.
    pub total_expenses: Decimal,
    /// Budget minus spend; negative once overspent.
    pub remaining_budget: Decimal,
    /// Spend over budget as a two-decimal percentage.
    pub usage_percentage: Decimal,
    /// Tier label from the active policy.
    pub alert_level: String,
}

/// Builds the budget alert report from store snapshots.
///
/// Projects without a positive budget are skipped. A project is included when
/// its rounded usage percentage is at or above `threshold_percentage`. Rows are
/// ordered by usage descending, then project name, then project id.
#[must_use]
pub fn budget_alert_report(
    snapshots: Vec<ProjectBudgetSnapshot>,
    threshold_percentage: Decimal,
    policy: &AlertTierPolicy,
) -> Vec<BudgetAlertRow> {
    let mut rows: Vec<BudgetAlertRow> = snapshots
        .into_iter()
        .filter(|snapshot| snapshot.budget > Decimal::ZERO)
        .filter_map(|snapshot| {
            let usage_percentage = percentage(snapshot.total_expenses, snapshot.budget)?;
            if usage_percentage < threshold_percentage {
                return None;
            }

            Some(BudgetAlertRow {
                alert_level: policy.level_for(usage_percentage).to_owned(),
                remaining_budget: snapshot.budget - snapshot.total_expenses,
                project_id: snapshot.project_id,
                project_name: snapshot.project_name,
                budget: snapshot.budget,
                total_expenses: snapshot.total_expenses,
                usage_percentage,
            })
        })
        .collect();

    rows.sort_by(|left, right| {
        right
            .usage_percentage
            .cmp(&left.usage_percentage)
            .then_with(|| left.project_name.cmp(&right.project_name))
            .then_with(|| left.project_id.cmp(&right.project_id))
    });
    rows
}
