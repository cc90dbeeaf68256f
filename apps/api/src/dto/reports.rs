use serde::Serialize;
use ts_rs::TS;

mod conversions;

/// One employee's monthly attendance.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/attendance-report-row-response.ts"
)]
pub struct AttendanceReportRowResponse {
    pub employee_id: String,
    pub employee_name: String,
    pub role: String,
    #[ts(type = "number")]
    pub total_days: i64,
    #[ts(type = "number")]
    pub present_days: i64,
    #[ts(type = "number")]
    pub absent_days: i64,
    #[ts(type = "number")]
    pub excused_days: i64,
    #[ts(type = "number")]
    pub sick_leave_days: i64,
    pub total_worked_hours: String,
    pub total_overtime_hours: String,
    /// Two-decimal percentage of present days over recorded days.
    pub attendance_rate: Option<String>,
}

/// One project at or above the requested budget usage.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/budget-alert-row-response.ts"
)]
pub struct BudgetAlertRowResponse {
    pub project_id: String,
    pub project_name: String,
    pub budget: String,
    pub total_expenses: String,
    pub remaining_budget: String,
    pub usage_percentage: String,
    pub alert_level: String,
}
