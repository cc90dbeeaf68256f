use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use santiye_application::ReportRepository;
use santiye_core::AppResult;
use santiye_domain::{AttendanceSummary, EmployeeId, ProjectBudgetSnapshot, ProjectId, ReportPeriod};

use crate::store_error::store_error;


/// PostgreSQL-backed aggregation over attendance and expense history.
///
/// Queries take no locks and only return raw counts and sums.
#[derive(Clone)]
pub struct PostgresReportRepository {
    pool: PgPool,
}

impl PostgresReportRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AttendanceSummaryRow {
    employee_id: Uuid,
    employee_name: String,
    role: String,
    total_days: i64,
    present_days: i64,
    absent_days: i64,
    excused_days: i64,
    sick_leave_days: i64,
    total_worked_hours: Decimal,
    total_overtime_hours: Decimal,
}

#[derive(Debug, FromRow)]
struct ProjectBudgetRow {
    project_id: Uuid,
    project_name: String,
    budget: Decimal,
    total_expenses: Decimal,
}

#[async_trait]
impl ReportRepository for PostgresReportRepository {
    async fn attendance_summaries(
        &self,
        period: ReportPeriod,
    ) -> AppResult<Vec<AttendanceSummary>> {
        let rows = sqlx::query_as::<_, AttendanceSummaryRow>(
            r#"
            SELECT
                employees.id AS employee_id,
                employees.full_name AS employee_name,
                employees.role,
                COUNT(*) AS total_days,
                COUNT(*) FILTER (WHERE attendance.status = 'Present') AS present_days,
                COUNT(*) FILTER (WHERE attendance.status = 'Absent') AS absent_days,
                COUNT(*) FILTER (WHERE attendance.status = 'Excused') AS excused_days,
                COUNT(*) FILTER (WHERE attendance.status = 'SickLeave') AS sick_leave_days,
                COALESCE(SUM(attendance.worked_hours), 0) AS total_worked_hours,
                COALESCE(SUM(attendance.overtime_hours), 0) AS total_overtime_hours
            FROM attendance
            INNER JOIN employees ON employees.id = attendance.employee_id
            WHERE EXTRACT(YEAR FROM attendance.date) = $1
                AND EXTRACT(MONTH FROM attendance.date) = $2
            GROUP BY employees.id, employees.full_name, employees.role
            "#,
        )
        .bind(period.year())
        .bind(i32::try_from(period.month()).unwrap_or_default())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            store_error(
                &format!(
                    "failed to aggregate attendance for {}-{:02}",
                    period.year(),
                    period.month()
                ),
                error,
            )
        })?;

        Ok(rows
            .into_iter()
            .map(|row| AttendanceSummary {
                employee_id: EmployeeId::from_uuid(row.employee_id),
                employee_name: row.employee_name,
                role: row.role,
                total_days: row.total_days,
                present_days: row.present_days,
                absent_days: row.absent_days,
                excused_days: row.excused_days,
                sick_leave_days: row.sick_leave_days,
                total_worked_hours: row.total_worked_hours,
                total_overtime_hours: row.total_overtime_hours,
            })
            .collect())
    }

    async fn project_budget_snapshots(&self) -> AppResult<Vec<ProjectBudgetSnapshot>> {
        let rows = sqlx::query_as::<_, ProjectBudgetRow>(
            r#"
            SELECT
                projects.id AS project_id,
                projects.name AS project_name,
                projects.budget,
                COALESCE(SUM(expenses.amount), 0) AS total_expenses
            FROM projects
            LEFT JOIN expenses ON expenses.project_id = projects.id
            GROUP BY projects.id, projects.name, projects.budget
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| store_error("failed to aggregate project expenses", error))?;

        Ok(rows
            .into_iter()
            .map(|row| ProjectBudgetSnapshot {
                project_id: ProjectId::from_uuid(row.project_id),
                project_name: row.project_name,
                budget: row.budget,
                total_expenses: row.total_expenses,
            })
            .collect())
    }
}
