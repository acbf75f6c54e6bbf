//! Registry error types.

use thiserror::Error;

use user_registry_core::MissingFields;

use crate::db::RepositoryError;
use crate::ids::EntropyError;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// One or more required fields were empty.
    #[error(transparent)]
    Validation(#[from] MissingFields),

    /// The email is already associated with a user.
    #[error("email is already in use")]
    EmailConflict,

    /// No user matched the lookup.
    #[error("user not found")]
    NotFound,

    /// The random source failed during id generation.
    #[error("entropy error: {0}")]
    Entropy(#[source] EntropyError),

    /// Any other persistence fault.
    #[error("storage error: {0}")]
    Storage(#[source] RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::EmailExists => Self::EmailConflict,
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Entropy(source) => Self::Entropy(source),
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_keep_their_kind() {
        assert!(matches!(
            ServiceError::from(RepositoryError::EmailExists),
            ServiceError::EmailConflict
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Entropy(EntropyError::Unavailable(
                "gone".to_owned()
            ))),
            ServiceError::Entropy(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::IdSpaceExhausted { attempts: 4 }),
            ServiceError::Storage(RepositoryError::IdSpaceExhausted { attempts: 4 })
        ));
    }

    #[test]
    fn test_storage_cause_is_preserved() {
        use std::error::Error as _;

        let err = ServiceError::from(RepositoryError::Database(sqlx::Error::PoolClosed));
        assert!(err.source().is_some());
    }
}
