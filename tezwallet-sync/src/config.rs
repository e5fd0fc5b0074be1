//! Sync configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sync engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Operations older than this are not notified (seconds)
    pub notification_window_secs: u64,
    /// Number of recent events kept by the event log
    pub event_log_capacity: usize,
    /// Warm the alias cache with counterparties before each pass
    pub prefetch_aliases: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            notification_window_secs: 60 * 60,
            event_log_capacity: 256,
            prefetch_aliases: true,
        }
    }
}

impl SyncConfig {
    /// Notification window as a duration
    pub fn notification_window(&self) -> Duration {
        Duration::from_secs(self.notification_window_secs)
    }

    /// Notification window in milliseconds, saturated to `i64`
    pub(crate) fn notification_window_millis(&self) -> i64 {
        i64::try_from(self.notification_window().as_millis()).unwrap_or(i64::MAX)
    }
}
