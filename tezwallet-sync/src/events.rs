//! Structured sync event log
//!
//! Every event is emitted through `tracing` with an `event` field and kept in
//! a bounded in-memory ring for diagnostics screens and tests.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Sync event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Pass started
    Started {
        /// Account address
        address: String,
        /// RFC 3339 time
        timestamp: String,
    },
    /// Counter unchanged, nothing fetched
    UpToDate {
        /// Account address
        address: String,
        /// Indexer counter
        counter: String,
    },
    /// Full fetch applied
    Refreshed {
        /// Account address
        address: String,
        /// New indexer counter
        counter: String,
        /// Activities now stored
        activities: usize,
        /// Notifications raised by this pass
        new_notifications: usize,
    },
    /// Notification sent to the user
    NotificationRaised {
        /// Account address
        address: String,
        /// Message text
        message: String,
    },
    /// Pass failed or response was rejected
    Failed {
        /// Account address
        address: String,
        /// Error description
        error: String,
    },
    /// Pass not run
    Skipped {
        /// Account address
        address: String,
        /// Reason
        reason: String,
    },
}

impl SyncEvent {
    /// Address the event refers to
    pub fn address(&self) -> &str {
        match self {
            SyncEvent::Started { address, .. }
            | SyncEvent::UpToDate { address, .. }
            | SyncEvent::Refreshed { address, .. }
            | SyncEvent::NotificationRaised { address, .. }
            | SyncEvent::Failed { address, .. }
            | SyncEvent::Skipped { address, .. } => address,
        }
    }
}

/// Bounded sync event log
#[derive(Debug)]
pub struct SyncEventLog {
    events: Mutex<VecDeque<SyncEvent>>,
    capacity: usize,
}

impl SyncEventLog {
    /// Create log keeping at most `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Log pass started
    pub fn log_started(&self, address: &str) {
        let timestamp = chrono::Utc::now().to_rfc3339();
        debug!(
            event = "account_sync_started",
            address = %address,
            timestamp = %timestamp,
            "Account sync started"
        );
        self.push(SyncEvent::Started {
            address: address.to_string(),
            timestamp,
        });
    }

    /// Log unchanged counter
    pub fn log_up_to_date(&self, address: &str, counter: &str) {
        debug!(
            event = "account_sync_up_to_date",
            address = %address,
            counter = %counter,
            "Account already up to date"
        );
        self.push(SyncEvent::UpToDate {
            address: address.to_string(),
            counter: counter.to_string(),
        });
    }

    /// Log full fetch applied
    pub fn log_refreshed(&self, address: &str, counter: &str, activities: usize, new_notifications: usize) {
        info!(
            event = "account_sync_refreshed",
            address = %address,
            counter = %counter,
            activities = activities,
            new_notifications = new_notifications,
            "Account activity refreshed"
        );
        self.push(SyncEvent::Refreshed {
            address: address.to_string(),
            counter: counter.to_string(),
            activities,
            new_notifications,
        });
    }

    /// Log notification sent
    pub fn log_notification(&self, address: &str, message: &str) {
        info!(
            event = "account_sync_notification",
            address = %address,
            message = %message,
            "Notification raised"
        );
        self.push(SyncEvent::NotificationRaised {
            address: address.to_string(),
            message: message.to_string(),
        });
    }

    /// Log failure
    pub fn log_failed(&self, address: &str, error: &str) {
        warn!(
            event = "account_sync_failed",
            address = %address,
            error = %error,
            "Account sync failed"
        );
        self.push(SyncEvent::Failed {
            address: address.to_string(),
            error: error.to_string(),
        });
    }

    /// Log skipped pass
    pub fn log_skipped(&self, address: &str, reason: &str) {
        debug!(
            event = "account_sync_skipped",
            address = %address,
            reason = %reason,
            "Account sync skipped"
        );
        self.push(SyncEvent::Skipped {
            address: address.to_string(),
            reason: reason.to_string(),
        });
    }

    /// Copy of the retained events, oldest first
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Retained events for one address, oldest first
    pub fn events_for(&self, address: &str) -> Vec<SyncEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.address() == address)
            .cloned()
            .collect()
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// True when no event is retained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every event
    pub fn clear(&self) {
        self.events.lock().clear();
        debug!("Sync event log cleared");
    }

    fn push(&self, event: SyncEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut events = self.events.lock();
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }
}

impl Default for SyncEventLog {
    fn default() -> Self {
        Self::new(256)
    }
}
