use super::*;

#[async_trait]
impl ReportRepository for InMemoryLedgerStore {
    async fn attendance_summaries(
        &self,
        period: ReportPeriod,
    ) -> AppResult<Vec<AttendanceSummary>> {
        let state = self.state.lock().await;
        let mut summaries: HashMap<EmployeeId, AttendanceSummary> = HashMap::new();

        for record in state
            .attendance
            .iter()
            .filter(|record| period.contains(record.date))
        {
            let Some(employee) = state.employees.get(&record.employee_id) else {
                continue;
            };
            let summary = summaries
                .entry(record.employee_id)
                .or_insert_with(|| AttendanceSummary {
                    employee_id: record.employee_id,
                    employee_name: employee.full_name.clone(),
                    role: employee.role.clone(),
                    total_days: 0,
                    present_days: 0,
                    absent_days: 0,
                    excused_days: 0,
                    sick_leave_days: 0,
                    total_worked_hours: Decimal::ZERO,
                    total_overtime_hours: Decimal::ZERO,
                });

            summary.total_days += 1;
            match record.status {
                AttendanceStatus::Present => summary.present_days += 1,
                AttendanceStatus::Absent => summary.absent_days += 1,
                AttendanceStatus::Excused => summary.excused_days += 1,
                AttendanceStatus::SickLeave => summary.sick_leave_days += 1,
            }
            summary.total_worked_hours += record.worked_hours;
            summary.total_overtime_hours += record.overtime_hours;
        }

        Ok(summaries.into_values().collect())
    }

    async fn project_budget_snapshots(&self) -> AppResult<Vec<ProjectBudgetSnapshot>> {
        let state = self.state.lock().await;

        Ok(state
            .projects
            .iter()
            .map(|(project_id, project)| ProjectBudgetSnapshot {
                project_id: *project_id,
                project_name: project.name.clone(),
                budget: project.budget,
                total_expenses: state
                    .expenses
                    .iter()
                    .filter(|expense| expense.project_id == Some(*project_id))
                    .map(|expense| expense.amount)
                    .sum(),
            })
            .collect())
    }
}
