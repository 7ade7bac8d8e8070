//! SingleFlight - at most one in-flight instance of an operation kind.
//!
//! The first caller to `begin` becomes the leader and holds the slot until its
//! [`FlightGuard`] is dropped. Anyone arriving while the slot is held gets a
//! [`FlightWaiter`] instead; the waiter resolves once the leader settles.
//! Whether a follower waits or simply gives up is the caller's decision.

use tokio::sync::watch;
use tracing::warn;

use super::{InMemoryLock, Lock, LockError};

/// Outcome of [`SingleFlight::begin`].
pub enum Flight<'a> {
    /// The slot was free and is now held by this caller.
    Leader(FlightGuard<'a>),
    /// Another caller holds the slot.
    Follower(FlightWaiter),
}

/// A single-slot guard for one operation kind.
pub struct SingleFlight {
    slot: InMemoryLock,
    settled: watch::Sender<u64>,
}

impl SingleFlight {
    pub fn new() -> Self {
        let (settled, _) = watch::channel(0);
        SingleFlight {
            slot: InMemoryLock::new(),
            settled,
        }
    }

    /// Try to take the slot.
    pub fn begin(&self) -> Result<Flight<'_>, LockError> {
        // Subscribe before trying the slot so a leader settling in between is
        // still observed by the follower.
        let settled = self.settled.subscribe();
        if self.slot.try_lock()? {
            Ok(Flight::Leader(FlightGuard { flight: self }))
        } else {
            Ok(Flight::Follower(FlightWaiter { settled }))
        }
    }

    /// Whether a leader currently holds the slot.
    pub fn in_flight(&self) -> Result<bool, LockError> {
        self.slot.is_locked()
    }

    /// Number of flights that have settled so far.
    pub fn settled_count(&self) -> u64 {
        *self.settled.borrow()
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Held by the leader. Dropping it frees the slot and wakes every waiter.
#[must_use = "the flight settles as soon as the guard is dropped"]
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.flight.slot.unlock() {
            warn!(error = %err, "failed to release single-flight slot");
        }
        self.flight
            .settled
            .send_modify(|count| *count = count.wrapping_add(1));
    }
}

/// Handed to callers that found the slot taken.
pub struct FlightWaiter {
    settled: watch::Receiver<u64>,
}

impl FlightWaiter {
    /// Wait until the flight that was in progress at `begin` time settles.
    pub async fn settled(mut self) {
        // Err means the SingleFlight itself was dropped, which also settles it.
        let _ = self.settled.changed().await;
    }
}
