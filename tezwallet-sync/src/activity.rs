//! Activity reconciliation and notification
//!
//! Compares the stored activity list with a freshly fetched one and notifies
//! the user about operations that are either new or that just left the
//! pending state. Old operations (outside the notification window) stay
//! silent so a bulk import does not flood the user.

use crate::services::{NotificationService, TokenMetadataService};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tezwallet_core::{Account, Activity, ActivityKind, TokenAmount};
use tracing::debug;

/// Notification text for one activity, without the account prefix.
///
/// A self-transfer yields both a "Sent" and a "Received" message. Unknown
/// kinds yield nothing.
pub fn activity_messages(
    activity: &Activity,
    account: &Account,
    metadata: &dyn TokenMetadataService,
) -> Vec<String> {
    match activity.kind {
        ActivityKind::Transaction => {
            let amount = activity.amount.clone().unwrap_or_default();
            let formatted = format_amount(metadata, activity.token_id.as_deref(), &amount);
            let mut messages = Vec::new();
            if activity.source_address() == Some(account.address.as_str()) {
                messages.push(format!("Sent {}", formatted));
            }
            if activity.destination_address() == Some(account.address.as_str()) {
                messages.push(format!("Received {}", formatted));
            }
            messages
        }
        ActivityKind::Delegation => vec!["Delegate updated".to_string()],
        ActivityKind::Origination => vec!["Contract originated".to_string()],
        ActivityKind::Activation => vec!["Account activated".to_string()],
        ActivityKind::Other(_) => Vec::new(),
    }
}

fn format_amount(
    metadata: &dyn TokenMetadataService,
    token_id: Option<&str>,
    amount: &TokenAmount,
) -> String {
    metadata.format_amount(token_id.unwrap_or_default(), amount)
}

/// Raises notifications for newly observed or newly confirmed activities
#[derive(Clone)]
pub struct ActivityReconciler {
    metadata: Arc<dyn TokenMetadataService>,
    notifications: Arc<dyn NotificationService>,
    window_millis: i64,
}

impl ActivityReconciler {
    /// Create new reconciler; operations older than `window_millis` are not notified
    pub fn new(
        metadata: Arc<dyn TokenMetadataService>,
        notifications: Arc<dyn NotificationService>,
        window_millis: i64,
    ) -> Self {
        Self {
            metadata,
            notifications,
            window_millis,
        }
    }

    /// Reconcile against the current time. Returns the messages that were sent.
    pub fn reconcile(&self, account: &Account, old: &[Activity], new: &[Activity]) -> Vec<String> {
        self.reconcile_at(account, old, new, Utc::now())
    }

    /// Reconcile as if the current time were `now`
    pub fn reconcile_at(
        &self,
        account: &Account,
        old: &[Activity],
        new: &[Activity],
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let previous: HashMap<&str, &Activity> =
            old.iter().map(|a| (a.hash.as_str(), a)).collect();
        let prefix = account.short_address();
        let mut raised = Vec::new();

        for activity in new {
            let candidate = match previous.get(activity.hash.as_str()) {
                None => true,
                Some(seen) => seen.is_pending(),
            };
            if !candidate || !self.is_recent(activity, now) {
                continue;
            }

            for message in activity_messages(activity, account, self.metadata.as_ref()) {
                let message = format!("{}: {}", prefix, message);
                debug!(address = %account.address, hash = %activity.hash, "Raising notification");
                self.notifications.add_success(&message);
                raised.push(message);
            }
        }
        raised
    }

    fn is_recent(&self, activity: &Activity, now: DateTime<Utc>) -> bool {
        let timestamp = activity.timestamp.unwrap_or(now);
        let diff = now.timestamp_millis().saturating_sub(timestamp.timestamp_millis());
        diff < self.window_millis
    }
}
