use std::str::FromStr;

use santiye_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable audit actions recorded for tracked entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A record was created.
    Create,
    /// A record was changed.
    Update,
    /// A record was removed.
    Delete,
    /// A user signed in.
    Login,
    /// A user signed out.
    Logout,
    /// A resource was assigned to a project or employee.
    Assign,
    /// A stock ledger entry was committed.
    Transaction,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Assign => "ASSIGN",
            Self::Transaction => "TRANSACTION",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "LOGIN" => Ok(Self::Login),
            "LOGOUT" => Ok(Self::Logout),
            "ASSIGN" => Ok(Self::Assign),
            "TRANSACTION" => Ok(Self::Transaction),
            _ => Err(AppError::Validation(format!(
                "unknown audit action '{value}'"
            ))),
        }
    }
}

/// Structured description of what an audited operation changed.
///
/// Serialized to text only when it reaches the audit store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditChange {
    /// Full snapshot of a newly created record.
    Created {
        /// Record fields after creation.
        snapshot: Value,
    },
    /// Before and after values of a changed record.
    Updated {
        /// Record fields before the change.
        before: Value,
        /// Record fields after the change.
        after: Value,
    },
    /// Last snapshot of a removed record.
    Deleted {
        /// Record fields before removal.
        snapshot: Value,
    },
    /// Free-form note for actions without a record snapshot.
    Message {
        /// Human readable text.
        text: String,
    },
}

impl AuditChange {
    /// Captures a created record.
    pub fn created(record: &impl Serialize) -> AppResult<Self> {
        Ok(Self::Created {
            snapshot: to_value(record)?,
        })
    }

    /// Captures a change between two versions of a record.
    pub fn updated(before: &impl Serialize, after: &impl Serialize) -> AppResult<Self> {
        Ok(Self::Updated {
            before: to_value(before)?,
            after: to_value(after)?,
        })
    }

    /// Captures a removed record.
    pub fn deleted(record: &impl Serialize) -> AppResult<Self> {
        Ok(Self::Deleted {
            snapshot: to_value(record)?,
        })
    }

    /// Creates a free-form message payload.
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message { text: text.into() }
    }

    /// Returns only the top-level fields whose values differ, for `Updated` payloads.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<String> {
        let Self::Updated { before, after } = self else {
            return Vec::new();
        };
        let empty = Map::new();
        let before = before.as_object().unwrap_or(&empty);
        let after = after.as_object().unwrap_or(&empty);

        let mut fields: Vec<String> = before
            .keys()
            .chain(after.keys())
            .filter(|key| before.get(*key) != after.get(*key))
            .cloned()
            .collect();
        fields.sort();
        fields.dedup();
        fields
    }

    /// Serializes the payload for storage.
    pub fn to_storage(&self) -> AppResult<String> {
        serde_json::to_string(self)
            .map_err(|error| AppError::Internal(format!("failed to encode audit change: {error}")))
    }

    /// Restores a payload read back from storage.
    pub fn from_storage(value: &str) -> AppResult<Self> {
        serde_json::from_str(value)
            .map_err(|error| AppError::Internal(format!("failed to decode audit change: {error}")))
    }
}

fn to_value(record: &impl Serialize) -> AppResult<Value> {
    serde_json::to_value(record)
        .map_err(|error| AppError::Internal(format!("failed to snapshot audited record: {error}")))
}
