//! Address -> domain alias cache with periodic eviction of negative results

use crate::{AliasStore, CancelToken, DomainResolver, Error, ALIAS_STORAGE_KEY};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Alias cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasCacheConfig {
    /// Interval between sweeps of unresolved entries (seconds)
    pub sweep_interval_secs: u64,
    /// Key of the persisted snapshot
    pub storage_key: String,
}

impl Default for AliasCacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 5 * 60,
            storage_key: ALIAS_STORAGE_KEY.to_string(),
        }
    }
}

impl AliasCacheConfig {
    /// Sweep interval as a duration (never zero)
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Result of an awaited alias lookup
#[derive(Debug)]
pub enum FetchOutcome {
    /// Address already had an entry (resolved or negative); nothing was queried
    AlreadyKnown,
    /// Another lookup for the same address is in flight
    Pending,
    /// Lookup succeeded; empty string means "no alias"
    Resolved(String),
    /// Lookup failed; the address stays unknown and will be retried
    Failed(Error),
}

/// Insertion-ordered address -> alias map
#[derive(Debug, Default)]
struct AliasMap {
    order: Vec<String>,
    values: HashMap<String, String>,
}

impl AliasMap {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut map = Self::default();
        for (address, alias) in pairs {
            map.insert(address, alias);
        }
        map
    }

    fn insert(&mut self, address: String, alias: String) {
        if !self.values.contains_key(&address) {
            self.order.push(address.clone());
        }
        self.values.insert(address, alias);
    }

    fn get(&self, address: &str) -> Option<&String> {
        self.values.get(address)
    }

    /// Drop entries whose alias is empty, returning how many were dropped
    fn evict_unresolved(&mut self) -> usize {
        let before = self.values.len();
        self.values.retain(|_, alias| !alias.is_empty());
        let values = &self.values;
        self.order.retain(|address| values.contains_key(address));
        before - self.values.len()
    }

    fn pairs(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .filter_map(|address| {
                self.values
                    .get(address)
                    .map(|alias| (address.clone(), alias.clone()))
            })
            .collect()
    }
}

struct CacheInner {
    entries: RwLock<AliasMap>,
    pending: Mutex<HashSet<String>>,
    // Held from snapshot to the end of the save
    persist_lock: AsyncMutex<()>,
    resolver: Arc<dyn DomainResolver>,
    store: Arc<dyn AliasStore>,
    config: AliasCacheConfig,
}

/// Removes an address from the pending set when the lookup ends, on every path.
struct PendingLease {
    inner: Arc<CacheInner>,
    address: String,
}

impl Drop for PendingLease {
    fn drop(&mut self) {
        self.inner.pending.lock().remove(&self.address);
    }
}

/// Shared alias cache.
///
/// Cloning is cheap; clones share the same map. The map lock is never held
/// across an await point.
#[derive(Clone)]
pub struct AliasCache {
    inner: Arc<CacheInner>,
}

#[allow(dead_code)]
fn _assert_alias_cache_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AliasCache>();
}

impl AliasCache {
    /// Create a cache seeded from the persisted snapshot.
    ///
    /// A snapshot that cannot be read is logged and the cache starts empty.
    pub fn load(
        store: Arc<dyn AliasStore>,
        resolver: Arc<dyn DomainResolver>,
        config: AliasCacheConfig,
    ) -> Self {
        let pairs = match store.load(&config.storage_key) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(key = %config.storage_key, "Failed to load alias snapshot: {}", e);
                Vec::new()
            }
        };
        debug!("Alias cache seeded with {} entries", pairs.len());

        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(AliasMap::from_pairs(pairs)),
                pending: Mutex::new(HashSet::new()),
                persist_lock: AsyncMutex::new(()),
                resolver,
                store,
                config,
            }),
        }
    }

    /// Stored value for `address`: `Some("")` means "checked, no alias",
    /// `None` means never checked.
    pub fn get_alias(&self, address: &str) -> Option<String> {
        self.inner.entries.read().get(address).cloned()
    }

    /// Non-empty alias for `address`, if one was resolved
    pub fn resolved_alias(&self, address: &str) -> Option<String> {
        self.get_alias(address).filter(|alias| !alias.is_empty())
    }

    /// True when `address` has an entry (resolved or negative)
    pub fn contains(&self, address: &str) -> bool {
        self.inner.entries.read().get(address).is_some()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.inner.entries.read().values.len()
    }

    /// True when the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in insertion order
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.inner.entries.read().pairs()
    }

    /// Start a background lookup for `address` unless it already has an entry.
    ///
    /// Fire-and-forget: failures are logged by the task. Outside a tokio
    /// runtime the request is dropped with a warning.
    pub fn prefetch_alias(&self, address: &str) {
        if address.is_empty() || self.contains(address) {
            return;
        }
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(address = %address, "No tokio runtime, skipping alias prefetch");
                return;
            }
        };
        let cache = self.clone();
        let address = address.to_string();
        handle.spawn(async move {
            cache.fetch_alias(&address).await;
        });
    }

    /// Resolve `address` and store the result, unless it already has an entry.
    pub async fn fetch_alias(&self, address: &str) -> FetchOutcome {
        let _lease = match self.claim(address) {
            Ok(lease) => lease,
            Err(outcome) => return outcome,
        };

        match self.inner.resolver.domain_from_address(address).await {
            Ok(domain) => {
                debug!(address = %address, domain = %domain, "Alias resolved");
                self.inner
                    .entries
                    .write()
                    .insert(address.to_string(), domain.clone());
                self.persist().await;
                FetchOutcome::Resolved(domain)
            }
            Err(e) => {
                warn!(address = %address, "Alias lookup failed: {}", e);
                FetchOutcome::Failed(e)
            }
        }
    }

    /// One eviction pass: drop every negative entry so it is looked up again.
    ///
    /// Resolved aliases are never evicted. Returns the number of dropped entries.
    pub fn sweep_unresolved(&self) -> usize {
        let evicted = self.inner.entries.write().evict_unresolved();
        if evicted > 0 {
            debug!("Alias sweep evicted {} unresolved entries", evicted);
        }
        evicted
    }

    /// Spawn the periodic sweep on the current tokio runtime.
    ///
    /// The first sweep runs one interval after the call. The task runs until
    /// [`SweepHandle::shutdown`] is called; dropping the handle detaches it.
    pub fn start_sweeper(&self) -> SweepHandle {
        let cancel = CancelToken::new();
        let task_cancel = cancel.clone();
        let cache = self.clone();
        let period = self.inner.config.sweep_interval();
        info!("Starting alias sweeper (interval {}s)", period.as_secs());

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        cache.sweep_unresolved();
                    }
                }
            }
            debug!("Alias sweeper stopped");
        });

        SweepHandle { cancel, task }
    }

    /// Take the pending slot for `address`.
    ///
    /// The entry check runs under the pending lock. A lookup stores its entry
    /// before releasing its slot, so a caller either sees the entry or the slot.
    fn claim(&self, address: &str) -> std::result::Result<PendingLease, FetchOutcome> {
        let mut pending = self.inner.pending.lock();
        if self.contains(address) {
            return Err(FetchOutcome::AlreadyKnown);
        }
        if !pending.insert(address.to_string()) {
            return Err(FetchOutcome::Pending);
        }
        Ok(PendingLease {
            inner: Arc::clone(&self.inner),
            address: address.to_string(),
        })
    }

    /// Write the current snapshot on the blocking pool.
    ///
    /// Saves are serialized and each one snapshots after the previous save
    /// finished, so the last write always carries every stored entry.
    async fn persist(&self) {
        let _guard = self.inner.persist_lock.lock().await;
        let snapshot = self.snapshot();
        let store = Arc::clone(&self.inner.store);
        let key = self.inner.config.storage_key.clone();

        match tokio::task::spawn_blocking(move || store.save(&key, &snapshot)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist alias snapshot: {}", e),
            Err(e) => warn!("Alias snapshot task ended abnormally: {}", e),
        }
    }
}

/// Handle of the background sweep task
pub struct SweepHandle {
    cancel: CancelToken,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the sweeper and wait for the task to exit
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            warn!("Alias sweeper task ended abnormally: {}", e);
        }
    }

    /// True once the task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
