//! Error types for the storage layer.

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::context::CallContext;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error while encoding a column.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No row for the given key.
    #[error("not found: {0}")]
    NotFound(String),

    /// A row with the given key already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The call context was cancelled or its deadline passed.
    #[error("operation cancelled or deadline exceeded")]
    Cancelled,

    /// A stored value could not be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The connection mutex was poisoned by a panicking holder.
    #[error("database connection lock poisoned")]
    LockPoisoned,

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// True for the backend's "no row" signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True when the backend could not serve the call at all: cancellation,
    /// an expired deadline, or a busy/locked/unopenable database.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Cancelled | Self::LockPoisoned | Self::Io(_) => true,
            Self::Database(e) => matches!(
                e.sqlite_error_code(),
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen)
            ),
            _ => false,
        }
    }

    /// Maps a failed insert to `AlreadyExists` on a key constraint violation.
    pub(crate) fn on_insert(err: rusqlite::Error, what: impl FnOnce() -> String) -> Self {
        if err.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            Self::AlreadyExists(what())
        } else {
            Self::Database(err)
        }
    }

    /// Rewrites failures caused by `ctx` finishing as `Cancelled`: SQLite
    /// interrupts raised by the progress handler, and busy/locked errors
    /// from a lock wait that stopped because the context was done.
    pub(crate) fn for_call(self, ctx: &CallContext) -> Self {
        let Self::Database(ref e) = self else {
            return self;
        };
        match e.sqlite_error_code() {
            Some(ErrorCode::OperationInterrupted) => Self::Cancelled,
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) if ctx.is_done() => {
                Self::Cancelled
            }
            _ => self,
        }
    }
}
