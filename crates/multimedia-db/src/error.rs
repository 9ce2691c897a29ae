//! Persistence errors

use multimedia_core::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PersistError {
    /// The metadata store rejected or failed the operation
    #[error("Metadata store error: {0}")]
    Store(String),

    /// A stored record could not be turned back into a domain value
    #[error("Failed to decode record: {0}")]
    Decode(String),

    /// The repository or store was constructed with unusable settings
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Asset already persisted with id {0}")]
    AlreadyPersisted(Uuid),
}

pub type PersistResult<T> = Result<T, PersistError>;

impl From<PersistError> for AppError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Config(msg) => AppError::InvalidArgument(msg),
            other => AppError::Persist(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for PersistError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                PersistError::Decode(err.to_string())
            }
            other => PersistError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multimedia_core::ErrorMetadata;

    #[test]
    fn test_persist_error_conversion() {
        let err: AppError = PersistError::Store("throttled".to_string()).into();
        assert!(matches!(err, AppError::Persist(_)));
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");

        let err: AppError = PersistError::Config("empty table".to_string()).into();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}
