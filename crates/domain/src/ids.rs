use std::str::FromStr;

use santiye_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(value).map(Self).map_err(|error| {
                    AppError::Validation(format!("invalid {} '{value}': {error}", $label))
                })
            }
        }
    };
}

uuid_identifier!(
    /// Identifier of a catalog material.
    MaterialId,
    "material id"
);
uuid_identifier!(
    /// Identifier of a stock ledger entry.
    StockAdjustmentId,
    "stock adjustment id"
);
uuid_identifier!(
    /// Identifier of a construction project.
    ProjectId,
    "project id"
);
uuid_identifier!(
    /// Identifier of a project material usage record.
    UsageId,
    "usage id"
);
uuid_identifier!(
    /// Identifier of an employee.
    EmployeeId,
    "employee id"
);
uuid_identifier!(
    /// Identifier of an audit log entry.
    AuditLogEntryId,
    "audit log entry id"
);
