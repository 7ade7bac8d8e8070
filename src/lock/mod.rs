//! Locks - single-slot try-locks used to keep mutations from overlapping.
//!
//! Nothing here ever blocks: a lock is either taken or the caller is told it
//! is busy. Guards release on drop, so every exit path (success, error, or a
//! dropped future) frees the slot.

mod error;
mod guard;
mod in_memory;
mod lock;
mod lock_manager;
mod single_flight;

pub use error::LockError;
pub use guard::LockGuard;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::Lock;
pub use lock_manager::LockManager;
pub use single_flight::{Flight, FlightGuard, FlightWaiter, SingleFlight};
