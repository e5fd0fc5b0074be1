//! Cooperative stop signal for the background sweep.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tokio::sync::Notify;

/// Stop signal shared between a [`crate::SweepHandle`] and its task.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    /// Create a token in the running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once a stop was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Request a stop and wake every waiter
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Resolve once a stop was requested
    pub async fn cancelled(&self) {
        // Register before checking the flag so a concurrent cancel() is not lost
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}
