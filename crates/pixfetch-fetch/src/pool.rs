//! Time-windowed admission for outgoing requests.
//!
//! A [`PermitPool`] bounds how many requests are *admitted* within a rolling
//! window. A slot is taken on admission and handed back a fixed interval
//! later, whether or not the admitted request has finished by then. Slow
//! responses therefore never stall replenishment, and more than `capacity`
//! requests may be in flight when responses outlive the interval.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use pixfetch_fetch::{PermitPool, ScopedLimit};
//!
//! # async fn example() {
//! let pool = PermitPool::new(8, Duration::from_millis(2000));
//!
//! // Instance-wide admission.
//! pool.acquire(None).await;
//!
//! // Admission additionally bounded by a limit owned by one call site.
//! let limit = ScopedLimit::new(2);
//! pool.acquire(Some(&limit)).await;
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{trace, warn};

/// Default number of slots per pool.
pub const DEFAULT_POOL_SIZE: usize = 8;

/// Default time a slot stays taken after admission.
pub const DEFAULT_POOL_INTERVAL: Duration = Duration::from_millis(2000);

/// Shared admission gate with a fixed number of slots per interval.
///
/// Cloning shares the same slots.
#[derive(Debug, Clone)]
pub struct PermitPool {
    slots: Arc<Semaphore>,
    capacity: usize,
    interval: Duration,
}

/// Additional admission limit scoped to one caller.
///
/// Passed to [`PermitPool::acquire`] to restrict one batch of requests
/// further than the pool does, without affecting other callers of the pool.
#[derive(Debug, Clone)]
pub struct ScopedLimit {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl ScopedLimit {
    /// Creates a limit with `capacity` slots. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of slots currently free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }
}

impl PermitPool {
    /// Creates a pool with `capacity` slots, each held for `interval` after
    /// admission. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize, interval: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
            interval,
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how long a slot stays taken after admission.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the number of slots currently free.
    #[must_use]
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Waits until a slot is free in this pool and, if given, in `scoped`.
    ///
    /// Both slots are released together once the pool interval has elapsed,
    /// counted from this call's admission. Acquisition never fails.
    ///
    /// The scoped slot is taken first so a caller queued on its own limit
    /// does not sit on an instance-wide slot meanwhile.
    pub async fn acquire(&self, scoped: Option<&ScopedLimit>) {
        let scoped_permit = match scoped {
            Some(limit) => take(&limit.slots).await,
            None => None,
        };
        let permit = take(&self.slots).await;

        trace!(
            available = self.slots.available_permits(),
            scoped = scoped.is_some(),
            "request admitted"
        );

        let interval = self.interval;
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            drop(permit);
            drop(scoped_permit);
        });
    }
}

impl Default for PermitPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE, DEFAULT_POOL_INTERVAL)
    }
}

/// Takes one slot. The semaphores are never closed, so this only yields
/// `None` if that invariant is broken, in which case admission proceeds.
async fn take(slots: &Arc<Semaphore>) -> Option<OwnedSemaphorePermit> {
    match Arc::clone(slots).acquire_owned().await {
        Ok(permit) => Some(permit),
        Err(e) => {
            warn!(error = %e, "permit semaphore closed, admitting without a slot");
            None
        }
    }
}
