use super::LockError;

/// A single-slot lock.
///
/// Acquisition is non-blocking: `try_lock` reports whether the slot was taken.
/// Controllers run on a cooperative async scheduler, so a held slot means
/// "reject this request", never "wait for it".
pub trait Lock: Send + Sync {
    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock. Releasing an unheld lock is a no-op.
    fn unlock(&self) -> Result<(), LockError>;

    /// Whether the lock is currently held.
    fn is_locked(&self) -> Result<bool, LockError>;
}
