use santiye_core::AppError;

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Maps a driver error onto the shared taxonomy.
///
/// Connection, pool and transaction-retry failures are transient and surface
/// as `StoreUnavailable`. A balance pushed past the numeric column range is an
/// `InvalidQuantity`. Everything else is `Internal` unless it is a uniqueness
/// conflict.
pub(crate) fn store_error(context: &str, error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => AppError::StoreUnavailable(format!("{context}: {error}")),
        sqlx::Error::Database(database_error) if database_error.is_unique_violation() => {
            AppError::Conflict(format!("{context}: {error}"))
        }
        sqlx::Error::Database(database_error)
            if matches!(
                database_error.code().as_deref(),
                Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
            ) =>
        {
            AppError::StoreUnavailable(format!("{context}: {error}"))
        }
        sqlx::Error::Database(database_error)
            if database_error.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) =>
        {
            AppError::InvalidQuantity(format!("{context}: {error}"))
        }
        _ => AppError::Internal(format!("{context}: {error}")),
    }
}

#[cfg(test)]
mod tests {
    use santiye_core::AppError;

    use super::store_error;

    #[test]
    fn pool_exhaustion_is_transient() {
        let error = store_error("failed to lock material", sqlx::Error::PoolTimedOut);
        assert!(matches!(
            error,
            AppError::StoreUnavailable(message) if message.starts_with("failed to lock material")
        ));
    }

    #[test]
    fn missing_row_is_internal() {
        let error = store_error("failed to read material", sqlx::Error::RowNotFound);
        assert!(matches!(error, AppError::Internal(_)));
        assert!(!error.is_business_rule());
    }
}
