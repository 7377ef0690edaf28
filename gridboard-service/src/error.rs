//! Error types for the service layer.

use gridboard_storage::StorageError;
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to callers of the services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required field was missing or empty. Never retried.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No entity with the given id.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other backend failure, passed through unchanged.
    #[error(transparent)]
    Storage(StorageError),
}

impl ServiceError {
    /// HTTP status an API layer should answer with.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Storage(_) => 500,
        }
    }
}

impl From<StorageError> for ServiceError {
    /// Recognizes the backend's "no row" signal; everything else passes through.
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => Self::NotFound(what),
            other => Self::Storage(other),
        }
    }
}
