//! Counting-semaphore ceiling on in-flight upstream calls.
//!
//! A permit is an RAII guard: dropping it (normal return, `?`, panic unwind
//! or future cancellation) hands the slot back.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::RelayError;

/// Bounded pool of call slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    permits: Arc<Semaphore>,
    capacity: NonZeroUsize,
}

impl ConcurrencyLimiter {
    /// A zero capacity is raised to one slot; an empty pool would never
    /// hand out a permit.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            permits: Arc::new(Semaphore::new(capacity.get())),
            capacity,
        }
    }

    /// Wait for a free slot.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, RelayError> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| RelayError::Other("concurrency limiter closed".into()))
    }

    /// Slots not currently held.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Slots currently held.
    pub fn in_flight(&self) -> usize {
        self.capacity.get() - self.available()
    }

    /// Returns `true` when every slot is held and the next caller will wait.
    pub fn is_saturated(&self) -> bool {
        self.available() == 0
    }
}
