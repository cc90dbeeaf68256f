use chrono::NaiveDate;
use santiye_core::{AppError, AppResult};
use santiye_domain::{NewProjectMaterialUsage, ProjectMaterialUsage, UsageUpdate};

use super::{RecordUsageRequest, UpdateUsageRequest, UsageResponse};
use crate::dto::common::{parse_date, parse_identifier, parse_optional_amount, parse_quantity};

impl RecordUsageRequest {
    /// Validates the payload, dating undated consumption on `today`.
    pub fn into_new_usage(self, today: NaiveDate) -> AppResult<NewProjectMaterialUsage> {
        NewProjectMaterialUsage::new(
            parse_identifier(&self.project_id)?,
            parse_identifier(&self.material_id)?,
            parse_quantity("quantity_used", &self.quantity_used)?,
            parse_optional_amount("unit_price_at_time", self.unit_price_at_time.as_deref())?,
            optional_date(self.date_used.as_deref())?.unwrap_or(today),
        )
    }
}

impl TryFrom<UpdateUsageRequest> for UsageUpdate {
    type Error = AppError;

    fn try_from(value: UpdateUsageRequest) -> Result<Self, Self::Error> {
        Self::new(
            parse_quantity("quantity_used", &value.quantity_used)?,
            parse_optional_amount("unit_price_at_time", value.unit_price_at_time.as_deref())?,
            optional_date(value.date_used.as_deref())?,
        )
    }
}

impl From<ProjectMaterialUsage> for UsageResponse {
    fn from(value: ProjectMaterialUsage) -> Self {
        Self {
            total_cost: value.total_cost().to_string(),
            usage_id: value.id.to_string(),
            project_id: value.project_id.to_string(),
            material_id: value.material_id.to_string(),
            quantity_used: value.quantity_used.to_string(),
            unit_price_at_time: value.unit_price_at_time.to_string(),
            date_used: value.date_used.format("%Y-%m-%d").to_string(),
        }
    }
}

fn optional_date(value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| parse_date("date_used", value))
        .transpose()
}
