use std::error::Error as StdError;

use thiserror::Error;

use crate::rating::types::{StoreId, UserId};

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

pub type RankingResult<T> = Result<T, RankingError>;

#[derive(Debug, Error)]
pub enum RankingError {
    /// Winner and loser are the same store
    #[error("store {store_id} cannot be compared with itself")]
    InvalidComparison { store_id: StoreId },

    /// Store is not among the stores the user has logged items against
    #[error("store {store_id} is not a candidate for user {user_id}")]
    UnknownStore { user_id: UserId, store_id: StoreId },

    /// Backing persistence could not be reached; nothing was written
    #[error("rating store unavailable: {0}")]
    StoreUnavailable(#[source] BoxError),

    /// Backing persistence refused the write, e.g. a constraint violation.
    /// Resubmitting the same write fails the same way.
    #[error("rating store rejected the write: {0}")]
    StoreRejected(#[source] BoxError),
}

impl RankingError {
    pub fn unavailable<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        RankingError::StoreUnavailable(err.into())
    }

    /// Storage failure, classified by whether the same write could succeed
    /// on a later attempt.
    pub fn storage(err: anyhow::Error) -> Self {
        let rejected = err
            .downcast_ref::<rusqlite::Error>()
            .is_some_and(is_constraint_violation);
        if rejected {
            RankingError::StoreRejected(err.into())
        } else {
            RankingError::unavailable(err)
        }
    }

    /// Only an unreachable store can succeed when retried with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RankingError::StoreUnavailable(_))
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
}

impl From<rusqlite::Error> for RankingError {
    fn from(err: rusqlite::Error) -> Self {
        if is_constraint_violation(&err) {
            RankingError::StoreRejected(err.into())
        } else {
            RankingError::unavailable(err)
        }
    }
}

impl From<r2d2::Error> for RankingError {
    fn from(err: r2d2::Error) -> Self {
        RankingError::unavailable(err)
    }
}

/// Add context to environment configuration errors
pub fn env_context(variable: &str) -> String {
    format!("Invalid value for environment variable {}", variable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_storage_errors_are_retryable() {
        assert!(!RankingError::InvalidComparison { store_id: 1 }.is_retryable());
        assert!(!RankingError::UnknownStore { user_id: 1, store_id: 2 }.is_retryable());
        assert!(RankingError::unavailable("disk gone").is_retryable());
    }

    #[test]
    fn test_constraint_violation_is_not_retryable() {
        let violation = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            Some("FOREIGN KEY constraint failed".to_string()),
        );
        let err = RankingError::storage(anyhow::Error::new(violation).context("Failed to upsert rating"));

        assert!(matches!(err, RankingError::StoreRejected(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_other_storage_failures_are_retryable() {
        let busy = rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY), None);
        assert!(RankingError::from(busy).is_retryable());
        assert!(RankingError::storage(anyhow::anyhow!("pool timed out")).is_retryable());
    }

    #[test]
    fn test_unavailable_keeps_source() {
        let err = RankingError::from(rusqlite::Error::InvalidQuery);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("rating store unavailable"));
    }
}
