//! Account activity sync engine
//!
//! Detects new on-chain operations through the indexer's account counter,
//! reconciles activity history and token balances, raises notifications for
//! fresh activity and keeps the counterparty alias cache warm.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod activity;
pub mod balances;
pub mod config;
pub mod counterparty;
pub mod error;
pub mod events;
mod inflight;
pub mod logging;
pub mod services;
pub mod sync;

pub use activity::{activity_messages, ActivityReconciler};
pub use balances::TokenBalanceReconciler;
pub use config::SyncConfig;
pub use counterparty::{counterparty, CounterpartyResolver};
pub use error::{Result, SyncError};
pub use events::{SyncEvent, SyncEventLog};
pub use logging::init_logging;
pub use services::{
    AccountSummary, Indexer, LookupService, NotificationService, OperationsResponse,
    TokenMetadataService, WalletContext, WalletStore,
};
pub use sync::{alias_candidates, SyncOrchestrator, SyncOutcome, SyncServices};
