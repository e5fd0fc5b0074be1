//! Token balance reconciliation

use crate::services::WalletStore;
use crate::Result;
use std::sync::Arc;
use tezwallet_core::{Account, TokenBalanceUpdate};
use tracing::debug;

/// Folds indexer-reported balances into an account
#[derive(Clone)]
pub struct TokenBalanceReconciler {
    store: Arc<dyn WalletStore>,
}

impl TokenBalanceReconciler {
    /// Create new reconciler persisting through `store`
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self { store }
    }

    /// Upsert every balance under its `contract:tokenId` key, then persist.
    ///
    /// Balances replace earlier values; nothing accumulates. The account is
    /// stored even when `tokens` is empty.
    pub fn apply_balances(&self, account: &mut Account, tokens: &[TokenBalanceUpdate]) -> Result<()> {
        for update in tokens {
            account.update_token_balance(&update.key(), update.balance.to_string());
        }
        debug!(
            address = %account.address,
            updated = tokens.len(),
            "Applied token balances"
        );
        self.store.store_account(account)
    }
}
