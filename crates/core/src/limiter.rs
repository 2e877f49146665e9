//! Process-wide bound on simultaneous outbound backend calls.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::Error;

/// Counting permit pool of fixed size.
///
/// Waiters are served in FIFO order. A [`Permit`] is released when dropped,
/// so every exit path of a backend call (success, error, timeout,
/// cancellation) gives its slot back.
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One unit of concurrency allowance. Dropping it releases the slot.
#[derive(Debug)]
pub struct Permit {
    _inner: OwnedSemaphorePermit,
}

impl ConcurrencyLimiter {
    /// Create a pool of `capacity` permits (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { semaphore: Arc::new(Semaphore::new(capacity)), capacity }
    }

    /// Wait until a permit is free.
    pub async fn acquire(&self) -> Result<Permit, Error> {
        let inner = Arc::clone(&self.semaphore).acquire_owned().await.map_err(|_| Error::LimiterClosed)?;
        Ok(Permit { _inner: inner })
    }

    /// Take a permit only if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit> {
        Arc::clone(&self.semaphore).try_acquire_owned().ok().map(|inner| Permit { _inner: inner })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Refuse further acquisitions; current waiters fail with [`Error::LimiterClosed`].
    pub fn close(&self) {
        self.semaphore.close();
    }
}
