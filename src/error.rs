use thiserror::Error;

use crate::lock::LockError;
use crate::store::StoreError;

/// A draft that cannot be submitted. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("no draft to submit")]
    NoDraft,
}

/// Error type for list-sync controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A create for this collection is already running.
    #[error("a create is already in flight for {collection}")]
    CreateInFlight { collection: &'static str },
    /// Another mutation of the same document is running.
    #[error("document {collection}:{id} has a mutation in flight")]
    Busy { collection: &'static str, id: String },
    #[error("failed to encode {collection} draft: {message}")]
    Encode {
        collection: &'static str,
        message: String,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl SyncError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            SyncError::Validation(_) => 422,
            SyncError::CreateInFlight { .. } | SyncError::Busy { .. } => 409,
            SyncError::Encode { .. } => 400,
            SyncError::Store(err) => err.status_code(),
            SyncError::Lock(_) => 500,
        }
    }

    /// Whether the error was raised before the store was contacted.
    pub fn is_rejected_locally(&self) -> bool {
        matches!(
            self,
            SyncError::Validation(_)
                | SyncError::CreateInFlight { .. }
                | SyncError::Busy { .. }
                | SyncError::Encode { .. }
        )
    }
}
