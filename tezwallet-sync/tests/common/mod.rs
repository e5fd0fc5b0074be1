//! Recording test doubles for the sync collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tezwallet_core::{Account, Activity, ActivityKind, AddressRecord, TokenAmount, TokenBalanceUpdate};
use tezwallet_names::{AliasCache, AliasCacheConfig, DomainResolver, MemoryAliasStore};
use tezwallet_sync::{
    AccountSummary, Indexer, LookupService, NotificationService, OperationsResponse, Result,
    SyncConfig, SyncError, SyncOrchestrator, SyncServices, TokenMetadataService, WalletContext,
    WalletStore,
};
use tokio::sync::Notify;

pub const ME: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";
pub const ME_SHORT: &str = "tz1VSU...jcjb";
pub const BOB: &str = "tz1bobbobbobbobbobbobbobbobbobbobbob";
pub const ALICE: &str = "tz1alicealicealicealicealicealicealic";

/// Indexer answering from scripted responses
#[derive(Default)]
pub struct MockIndexer {
    pub summaries: Mutex<VecDeque<Result<AccountSummary>>>,
    pub operations: Mutex<VecDeque<Result<OperationsResponse>>>,
    pub info_calls: AtomicUsize,
    pub operation_calls: AtomicUsize,
    pub last_wallet: Mutex<Option<WalletContext>>,
    pub last_known_ids: Mutex<Vec<String>>,
    pub gate: Mutex<Option<Arc<Notify>>>,
}

impl MockIndexer {
    pub fn push_summary(&self, summary: AccountSummary) {
        self.summaries.lock().push_back(Ok(summary));
    }

    pub fn push_summary_error(&self, message: &str) {
        self.summaries
            .lock()
            .push_back(Err(SyncError::Indexer(message.to_string())));
    }

    pub fn push_operations(&self, operations: Value) {
        self.operations.lock().push_back(Ok(OperationsResponse {
            operations,
            unknown_token_ids: None,
        }));
    }

    pub fn push_operations_response(&self, response: OperationsResponse) {
        self.operations.lock().push_back(Ok(response));
    }

    pub fn push_operations_error(&self, message: &str) {
        self.operations
            .lock()
            .push_back(Err(SyncError::Indexer(message.to_string())));
    }

    pub fn hold_account_info(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }

    pub fn operation_calls(&self) -> usize {
        self.operation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Indexer for MockIndexer {
    async fn account_info(&self, _address: &str, known_token_ids: &[String]) -> Result<AccountSummary> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_known_ids.lock() = known_token_ids.to_vec();
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.summaries
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::Indexer("no scripted summary".to_string())))
    }

    async fn get_operations(
        &self,
        _address: &str,
        _known_token_ids: &[String],
        wallet: &WalletContext,
    ) -> Result<OperationsResponse> {
        self.operation_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_wallet.lock() = Some(wallet.clone());
        self.operations
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SyncError::Indexer("no scripted operations".to_string())))
    }
}

/// Token registry recording metadata searches
#[derive(Default)]
pub struct MockMetadata {
    pub searches: Mutex<Vec<(String, String)>>,
    pub known: Mutex<Vec<String>>,
}

impl MockMetadata {
    pub fn searches(&self) -> Vec<(String, String)> {
        self.searches.lock().clone()
    }
}

impl TokenMetadataService for MockMetadata {
    fn search_metadata(&self, contract: &str, token_id: &str) {
        self.searches
            .lock()
            .push((contract.to_string(), token_id.to_string()));
    }

    fn known_token_ids(&self) -> Vec<String> {
        self.known.lock().clone()
    }

    fn format_amount(&self, token_id: &str, amount: &TokenAmount) -> String {
        if token_id.is_empty() {
            format!("{} mutez", amount)
        } else {
            format!("{} {}", amount, token_id)
        }
    }
}

/// Address book recording tracked addresses
#[derive(Default)]
pub struct MockLookup {
    pub checked: Mutex<Vec<String>>,
}

impl MockLookup {
    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().clone()
    }
}

impl LookupService for MockLookup {
    fn check(&self, address: &str) {
        self.checked.lock().push(address.to_string());
    }

    fn resolve(&self, record: &AddressRecord) -> String {
        format!("contact:{}", record.address)
    }
}

/// Notification inbox
#[derive(Default)]
pub struct MockNotifications {
    pub messages: Mutex<Vec<String>>,
}

impl MockNotifications {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl NotificationService for MockNotifications {
    fn add_success(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// In-memory wallet
#[derive(Default)]
pub struct MemoryWallet {
    pub accounts: Mutex<BTreeMap<String, Account>>,
    pub stores: AtomicUsize,
    pub fail_stores: Mutex<bool>,
}

impl MemoryWallet {
    pub fn insert(&self, account: Account) {
        self.accounts.lock().insert(account.address.clone(), account);
    }

    pub fn get(&self, address: &str) -> Account {
        self.accounts
            .lock()
            .get(address)
            .cloned()
            .expect("account in wallet")
    }

    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }
}

impl WalletStore for MemoryWallet {
    fn account(&self, address: &str) -> Result<Option<Account>> {
        Ok(self.accounts.lock().get(address).cloned())
    }

    fn account_addresses(&self) -> Vec<String> {
        self.accounts.lock().keys().cloned().collect()
    }

    fn store_account(&self, account: &Account) -> Result<()> {
        if *self.fail_stores.lock() {
            return Err(SyncError::Storage("write refused".to_string()));
        }
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.accounts
            .lock()
            .insert(account.address.clone(), account.clone());
        Ok(())
    }
}

/// Domain resolver recording lookups; every address resolves to no domain
#[derive(Default)]
pub struct RecordingResolver {
    pub lookups: Mutex<Vec<String>>,
}

#[async_trait]
impl DomainResolver for RecordingResolver {
    async fn domain_from_address(&self, address: &str) -> tezwallet_names::Result<String> {
        self.lookups.lock().push(address.to_string());
        Ok(String::new())
    }
}

/// Orchestrator wired to recording doubles
pub struct Harness {
    pub indexer: Arc<MockIndexer>,
    pub metadata: Arc<MockMetadata>,
    pub lookup: Arc<MockLookup>,
    pub notifications: Arc<MockNotifications>,
    pub wallet: Arc<MemoryWallet>,
    pub resolver: Arc<RecordingResolver>,
    pub aliases: AliasCache,
    pub orchestrator: Arc<SyncOrchestrator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    pub fn with_config(config: SyncConfig) -> Self {
        let indexer = Arc::new(MockIndexer::default());
        let metadata = Arc::new(MockMetadata::default());
        let lookup = Arc::new(MockLookup::default());
        let notifications = Arc::new(MockNotifications::default());
        let wallet = Arc::new(MemoryWallet::default());
        let resolver = Arc::new(RecordingResolver::default());
        let aliases = AliasCache::load(
            Arc::new(MemoryAliasStore::new()),
            resolver.clone(),
            AliasCacheConfig::default(),
        );

        let services = SyncServices {
            indexer: indexer.clone(),
            metadata: metadata.clone(),
            lookup: lookup.clone(),
            notifications: notifications.clone(),
            wallet: wallet.clone(),
        };
        let orchestrator = Arc::new(SyncOrchestrator::new(services, aliases.clone(), config));

        Self {
            indexer,
            metadata,
            lookup,
            notifications,
            wallet,
            resolver,
            aliases,
            orchestrator,
        }
    }
}

pub fn summary(counter: &str) -> AccountSummary {
    AccountSummary {
        counter: counter.to_string(),
        ..Default::default()
    }
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(minutes)
}

pub fn synced_account(state: &str, activities: Vec<Activity>) -> Account {
    let mut account = Account::new(ME);
    account.state = state.to_string();
    account.activities = activities;
    account
}

pub fn received(hash: &str, status: i32, at: DateTime<Utc>, amount: u64) -> Activity {
    Activity::new(hash, ActivityKind::Transaction)
        .with_status(status)
        .with_timestamp(at)
        .with_source(BOB)
        .with_destination(ME)
        .with_amount(amount, "")
}

pub fn sent(hash: &str, status: i32, at: DateTime<Utc>, amount: u64) -> Activity {
    Activity::new(hash, ActivityKind::Transaction)
        .with_status(status)
        .with_timestamp(at)
        .with_source(ME)
        .with_destination(ALICE)
        .with_amount(amount, "")
}

pub fn balance(contract: &str, token_id: &str, amount: u64) -> TokenBalanceUpdate {
    TokenBalanceUpdate::new(contract, token_id, amount)
}

pub fn to_json(activities: &[Activity]) -> Value {
    serde_json::to_value(activities).expect("activities serialize")
}
