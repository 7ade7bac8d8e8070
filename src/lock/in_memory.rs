use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Lock, LockError, LockManager};

/// In-memory lock backed by a `Mutex<bool>`.
#[derive(Debug, Default)]
pub struct InMemoryLock {
    state: Mutex<bool>,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            state: Mutex::new(false),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, bool>, LockError> {
        self.state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))
    }
}

impl Lock for InMemoryLock {
    fn try_lock(&self) -> Result<bool, LockError> {
        let mut locked = self.state()?;
        if *locked {
            Ok(false)
        } else {
            *locked = true;
            Ok(true)
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        *self.state()? = false;
        Ok(())
    }

    fn is_locked(&self) -> Result<bool, LockError> {
        Ok(*self.state()?)
    }
}

/// In-memory lock manager backed by a `HashMap<String, Arc<InMemoryLock>>`.
///
/// Lazily creates one `InMemoryLock` per unique key and returns the same
/// `Arc` for repeated lookups.
#[derive(Debug, Default)]
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<String, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Number of ids that currently have a lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, id: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
        Ok(locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(InMemoryLock::new()))
            .clone())
    }

    fn forget(&self, id: &str) -> Result<(), LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
        // A caller holding a clone may be about to lock it. Removing the entry
        // then would hand the next caller a second, independent lock.
        let in_use = match locks.get(id) {
            Some(lock) => Arc::strong_count(lock) > 1 || lock.is_locked()?,
            None => false,
        };
        if !in_use {
            locks.remove(id);
        }
        Ok(())
    }
}
