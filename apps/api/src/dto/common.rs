use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use santiye_core::{AppError, AppResult};
use serde::Serialize;
use ts_rs::TS;

/// Status of one backing dependency.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// Parses a quantity; unparsable values are quantity errors, not generic validation.
pub(crate) fn parse_quantity(field: &str, value: &str) -> AppResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(|error| {
        AppError::InvalidQuantity(format!("{field} '{value}' is not a decimal number: {error}"))
    })
}

pub(crate) fn parse_amount(field: &str, value: &str) -> AppResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(|error| {
        AppError::Validation(format!("{field} '{value}' is not a decimal number: {error}"))
    })
}

pub(crate) fn parse_optional_amount(
    field: &str,
    value: Option<&str>,
) -> AppResult<Option<Decimal>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| parse_amount(field, value))
        .transpose()
}

pub(crate) fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|error| {
        AppError::Validation(format!("{field} '{value}' must be a YYYY-MM-DD date: {error}"))
    })
}

pub(crate) fn parse_identifier<T>(value: &str) -> AppResult<T>
where
    T: FromStr<Err = AppError>,
{
    T::from_str(value.trim())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use santiye_core::AppError;
    use santiye_domain::MaterialId;

    use super::{parse_amount, parse_date, parse_identifier, parse_optional_amount, parse_quantity};

    #[test]
    fn decimals_keep_their_written_scale() {
        let Ok(quantity) = parse_quantity("quantity", " 12.750 ") else {
            panic!("quantity should parse");
        };
        assert_eq!(quantity, Decimal::new(12_750, 3));
        assert_eq!(quantity.to_string(), "12.750");
    }

    #[test]
    fn unparsable_quantity_is_a_quantity_error() {
        assert!(matches!(
            parse_quantity("quantity", "NaN"),
            Err(AppError::InvalidQuantity(_))
        ));
        assert!(matches!(
            parse_amount("unit_price", "ten"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn blank_optional_amount_is_absent() {
        assert!(matches!(parse_optional_amount("unit_price", Some("  ")), Ok(None)));
        assert!(matches!(parse_optional_amount("unit_price", None), Ok(None)));
    }

    #[test]
    fn dates_and_identifiers_are_strict() {
        assert!(parse_date("date_used", "2025-02-30").is_err());
        assert!(parse_date("date_used", "2025-02-28").is_ok());
        assert!(parse_identifier::<MaterialId>("not-a-uuid").is_err());
    }
}
