use std::sync::Arc;

use super::{Lock, LockError};

/// Factory trait for obtaining per-document locks.
///
/// `ListSync` asks its manager for one lock per document id so that two
/// mutations of the same document never overlap.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or create) the lock for the given identifier.
    ///
    /// Repeated calls with the same `id` must return the same logical lock.
    fn get_lock(&self, id: &str) -> Result<Arc<Self::Lock>, LockError>;

    /// Drop the lock for `id` once the document it guards is gone. A lock
    /// that is held, or handed out and not yet released, is kept.
    fn forget(&self, id: &str) -> Result<(), LockError>;
}
