use std::sync::Arc;

use tracing::warn;

use super::{Lock, LockError};

/// Scoped ownership of a held [`Lock`]. The lock is released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<L: Lock> {
    lock: Arc<L>,
}

impl<L: Lock> LockGuard<L> {
    /// Take `lock` if it is free. `Ok(None)` means someone else holds it.
    pub fn try_acquire(lock: Arc<L>) -> Result<Option<Self>, LockError> {
        if lock.try_lock()? {
            Ok(Some(LockGuard { lock }))
        } else {
            Ok(None)
        }
    }
}

impl<L: Lock> Drop for LockGuard<L> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.unlock() {
            warn!(error = %err, "failed to release lock guard");
        }
    }
}
