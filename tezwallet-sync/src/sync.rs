//! Account sync orchestration
//!
//! One pass per account:
//! 1. warm the alias cache with known counterparties
//! 2. ask the indexer for the account counter (and balances)
//! 3. stop if the counter matches the stored state
//! 4. otherwise apply balances, fetch every operation, store the account and
//!    notify about new activity (never on the very first sync)
//!
//! Errors never escape a pass: they are logged and reported in
//! [`SyncOutcome::Failed`].

use crate::activity::ActivityReconciler;
use crate::balances::TokenBalanceReconciler;
use crate::counterparty::CounterpartyResolver;
use crate::events::SyncEventLog;
use crate::inflight::InflightSet;
use crate::services::{
    Indexer, LookupService, NotificationService, TokenMetadataService, WalletContext, WalletStore,
};
use crate::{Result, SyncConfig, SyncError};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tezwallet_core::{Account, Activity, ActivityKind, TokenKey};
use tezwallet_names::AliasCache;
use tracing::{debug, info, warn};

/// Result of one sync pass
#[derive(Debug)]
pub enum SyncOutcome {
    /// Indexer counter matches the stored state; nothing changed
    UpToDate,
    /// Full fetch applied
    Refreshed {
        /// Notifications raised by this pass
        new_notifications: usize,
    },
    /// Operation list did not decode; nothing applied
    MalformedOperations,
    /// Another pass for the same account is running
    AlreadyRunning,
    /// Pass aborted
    Failed(SyncError),
}

impl SyncOutcome {
    /// `upToDate` flag as reported to callers; `None` when no report is made
    pub fn up_to_date(&self) -> Option<bool> {
        match self {
            SyncOutcome::UpToDate => Some(true),
            SyncOutcome::Refreshed { .. } | SyncOutcome::MalformedOperations => Some(false),
            SyncOutcome::AlreadyRunning | SyncOutcome::Failed(_) => None,
        }
    }

    /// Error of a failed pass
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            SyncOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// External services the orchestrator depends on
#[derive(Clone)]
pub struct SyncServices {
    /// Blockchain indexer
    pub indexer: Arc<dyn Indexer>,
    /// Token registry
    pub metadata: Arc<dyn TokenMetadataService>,
    /// Address book
    pub lookup: Arc<dyn LookupService>,
    /// User notifications
    pub notifications: Arc<dyn NotificationService>,
    /// Wallet persistence
    pub wallet: Arc<dyn WalletStore>,
}

/// Account sync orchestrator
pub struct SyncOrchestrator {
    indexer: Arc<dyn Indexer>,
    metadata: Arc<dyn TokenMetadataService>,
    lookup: Arc<dyn LookupService>,
    wallet: Arc<dyn WalletStore>,
    counterparties: CounterpartyResolver,
    balances: TokenBalanceReconciler,
    activities: ActivityReconciler,
    inflight: Arc<InflightSet>,
    events: SyncEventLog,
    config: SyncConfig,
}

#[allow(dead_code)]
fn _assert_sync_orchestrator_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SyncOrchestrator>();
}

impl SyncOrchestrator {
    /// Create new orchestrator
    pub fn new(services: SyncServices, aliases: AliasCache, config: SyncConfig) -> Self {
        let SyncServices {
            indexer,
            metadata,
            lookup,
            notifications,
            wallet,
        } = services;

        Self {
            counterparties: CounterpartyResolver::new(aliases, Arc::clone(&lookup)),
            balances: TokenBalanceReconciler::new(Arc::clone(&wallet)),
            activities: ActivityReconciler::new(
                Arc::clone(&metadata),
                notifications,
                config.notification_window_millis(),
            ),
            inflight: InflightSet::new(),
            events: SyncEventLog::new(config.event_log_capacity),
            indexer,
            metadata,
            lookup,
            wallet,
            config,
        }
    }

    /// Event log of past passes
    pub fn events(&self) -> &SyncEventLog {
        &self.events
    }

    /// Counterparty resolver shared with the UI
    pub fn counterparties(&self) -> &CounterpartyResolver {
        &self.counterparties
    }

    /// Configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// True while a pass for `address` is running
    pub fn is_syncing(&self, address: &str) -> bool {
        self.inflight.contains(address)
    }

    /// Run one sync pass for the account at `address`
    pub async fn sync(&self, address: &str) -> SyncOutcome {
        let _lease = match self.inflight.try_acquire(address) {
            Some(lease) => lease,
            None => {
                self.events.log_skipped(address, "sync already running");
                return SyncOutcome::AlreadyRunning;
            }
        };

        self.events.log_started(address);
        match self.run_pass(address).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.events
                    .log_failed(address, &format!("{} ({})", e, e.kind()));
                SyncOutcome::Failed(e)
            }
        }
    }

    /// Sync every wallet account, one after another
    pub async fn sync_all(&self) -> Vec<(String, SyncOutcome)> {
        let addresses = self.wallet.account_addresses();
        info!("Syncing {} accounts", addresses.len());

        let mut outcomes = Vec::with_capacity(addresses.len());
        for address in addresses {
            let outcome = self.sync(&address).await;
            outcomes.push((address, outcome));
        }
        outcomes
    }

    async fn run_pass(&self, address: &str) -> Result<SyncOutcome> {
        let mut account = self
            .wallet
            .account(address)?
            .ok_or_else(|| SyncError::AccountNotFound(address.to_string()))?;

        if self.config.prefetch_aliases {
            self.prefetch_aliases(&account);
        }

        let known_token_ids = self.metadata.known_token_ids();
        let summary = self
            .indexer
            .account_info(&account.address, &known_token_ids)
            .await?;
        self.handle_unknown_token_ids(summary.unknown_token_ids.as_deref());

        if summary.counter == account.state {
            self.events.log_up_to_date(&account.address, &summary.counter);
            return Ok(SyncOutcome::UpToDate);
        }

        if let Some(tokens) = summary.tokens.as_deref().filter(|t| !t.is_empty()) {
            self.balances.apply_balances(&mut account, tokens)?;
        }

        self.apply_operations(&mut account, &summary.counter).await
    }

    /// Fetch the full operation list and apply it to `account` under `counter`.
    ///
    /// Takes the same per-account slot as [`sync`](Self::sync) and returns
    /// [`SyncOutcome::AlreadyRunning`] while a pass for the account is in
    /// flight. A malformed list is rejected whole: the account is left
    /// untouched and [`SyncOutcome::MalformedOperations`] is returned.
    pub async fn get_all_transactions(&self, account: &mut Account, counter: &str) -> Result<SyncOutcome> {
        let _lease = match self.inflight.try_acquire(&account.address) {
            Some(lease) => lease,
            None => {
                self.events
                    .log_skipped(&account.address, "sync already running");
                return Ok(SyncOutcome::AlreadyRunning);
            }
        };
        self.apply_operations(account, counter).await
    }

    async fn apply_operations(&self, account: &mut Account, counter: &str) -> Result<SyncOutcome> {
        let known_token_ids = self.metadata.known_token_ids();
        let wallet = WalletContext {
            addresses: self.wallet.account_addresses(),
        };
        let response = self
            .indexer
            .get_operations(&account.address, &known_token_ids, &wallet)
            .await?;
        self.handle_unknown_token_ids(response.unknown_token_ids.as_deref());

        let fetched = match decode_operations(response.operations) {
            Ok(activities) => activities,
            Err(e) => {
                self.events.log_failed(&account.address, &e.to_string());
                return Ok(SyncOutcome::MalformedOperations);
            }
        };

        let old_activities = std::mem::replace(&mut account.activities, fetched);
        let old_state = std::mem::replace(&mut account.state, counter.to_string());
        self.wallet.store_account(account)?;

        let account: &Account = account;
        let raised = if old_state.is_empty() {
            debug!(address = %account.address, "First sync, notifications suppressed");
            Vec::new()
        } else {
            self.activities
                .reconcile(account, &old_activities, &account.activities)
        };
        for message in &raised {
            self.events.log_notification(&account.address, message);
        }

        for activity in &account.activities {
            let address = self
                .counterparties
                .resolve_counterparty_address(activity, account, false);
            if !address.is_empty() {
                self.lookup.check(&address);
            }
        }

        self.events.log_refreshed(
            &account.address,
            counter,
            account.activities.len(),
            raised.len(),
        );
        Ok(SyncOutcome::Refreshed {
            new_notifications: raised.len(),
        })
    }

    /// Start alias lookups for every transaction party and wallet account
    fn prefetch_aliases(&self, account: &Account) {
        let wallet_addresses = self.wallet.account_addresses();
        for address in alias_candidates(&account.activities, &wallet_addresses) {
            self.counterparties.prefetch_alias(&address);
        }
    }

    /// One metadata search per well-formed `contract:tokenId`
    fn handle_unknown_token_ids(&self, ids: Option<&[String]>) {
        for id in ids.unwrap_or_default() {
            match id.parse::<TokenKey>() {
                Ok(key) => self.metadata.search_metadata(&key.contract, &key.token_id),
                Err(e) => warn!("Skipping unknown token id: {}", e),
            }
        }
    }
}

/// Transaction parties plus wallet accounts, deduplicated in first-seen order
pub fn alias_candidates(activities: &[Activity], wallet_addresses: &[String]) -> Vec<String> {
    let parties = activities
        .iter()
        .filter(|a| a.kind == ActivityKind::Transaction)
        .flat_map(|a| [a.source_address(), a.destination_address()])
        .flatten();

    let mut seen = HashSet::new();
    parties
        .chain(wallet_addresses.iter().map(String::as_str))
        .filter(|address| !address.is_empty() && seen.insert(*address))
        .map(str::to_string)
        .collect()
}

/// Decode an operation list; anything but an array of activities is malformed
fn decode_operations(operations: Value) -> Result<Vec<Activity>> {
    match operations {
        Value::Array(_) => Ok(serde_json::from_value(operations)?),
        Value::Null => Err(SyncError::MalformedResponse(
            "missing operation list".to_string(),
        )),
        other => Err(SyncError::MalformedResponse(format!(
            "expected an operation list, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
