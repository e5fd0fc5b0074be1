//! One sync pass per account at a time

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Addresses with a sync pass currently running
#[derive(Debug, Default)]
pub(crate) struct InflightSet {
    addresses: Mutex<HashSet<String>>,
}

/// Held by the pass that owns an address; releases it on drop.
#[derive(Debug)]
pub(crate) struct InflightLease {
    set: Arc<InflightSet>,
    address: String,
}

impl InflightSet {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Claim `address`, or `None` if another pass already holds it
    pub(crate) fn try_acquire(self: &Arc<Self>, address: &str) -> Option<InflightLease> {
        if !self.addresses.lock().insert(address.to_string()) {
            return None;
        }
        Some(InflightLease {
            set: Arc::clone(self),
            address: address.to_string(),
        })
    }

    pub(crate) fn contains(&self, address: &str) -> bool {
        self.addresses.lock().contains(address)
    }
}

impl Drop for InflightLease {
    fn drop(&mut self) {
        self.set.addresses.lock().remove(&self.address);
    }
}
