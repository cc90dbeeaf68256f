use santiye_domain::{AttendanceReportRow, BudgetAlertRow};

use super::{AttendanceReportRowResponse, BudgetAlertRowResponse};

impl From<AttendanceReportRow> for AttendanceReportRowResponse {
    fn from(value: AttendanceReportRow) -> Self {
        Self {
            employee_id: value.employee_id.to_string(),
            employee_name: value.employee_name,
            role: value.role,
            total_days: value.total_days,
            present_days: value.present_days,
            absent_days: value.absent_days,
            excused_days: value.excused_days,
            sick_leave_days: value.sick_leave_days,
            total_worked_hours: value.total_worked_hours.to_string(),
            total_overtime_hours: value.total_overtime_hours.to_string(),
            attendance_rate: value.attendance_rate.map(|rate| rate.to_string()),
        }
    }
}

impl From<BudgetAlertRow> for BudgetAlertRowResponse {
    fn from(value: BudgetAlertRow) -> Self {
        Self {
            project_id: value.project_id.to_string(),
            project_name: value.project_name,
            budget: value.budget.to_string(),
            total_expenses: value.total_expenses.to_string(),
            remaining_budget: value.remaining_budget.to_string(),
            usage_percentage: value.usage_percentage.to_string(),
            alert_level: value.alert_level,
        }
    }
}
