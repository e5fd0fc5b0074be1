//! Collaborator contracts consumed by the sync engine
//!
//! The engine never talks to the network or the disk directly. Everything
//! goes through these traits so the wallet can plug in its own indexer
//! client, token registry and persistence.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tezwallet_core::{Account, AddressRecord, TokenAmount, TokenBalanceUpdate};

/// Lightweight account summary used for change detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    /// Opaque freshness token; changes whenever the account has new operations
    pub counter: String,
    /// Current token balances, when the indexer reports them
    #[serde(default)]
    pub tokens: Option<Vec<TokenBalanceUpdate>>,
    /// Tokens seen on chain but not known locally (`contract:tokenId`)
    #[serde(default)]
    pub unknown_token_ids: Option<Vec<String>>,
}

/// Full operation list for an account.
///
/// `operations` is kept undecoded; the orchestrator validates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsResponse {
    /// Operation list, expected to be a JSON array of activities
    #[serde(default)]
    pub operations: serde_json::Value,
    /// Tokens seen on chain but not known locally (`contract:tokenId`)
    #[serde(default)]
    pub unknown_token_ids: Option<Vec<String>>,
}

/// Wallet-wide context passed along with operation queries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletContext {
    /// Every account address held by the wallet
    pub addresses: Vec<String>,
}

/// Blockchain indexer
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Counter, balances and unknown tokens for an account
    async fn account_info(&self, address: &str, known_token_ids: &[String])
        -> Result<AccountSummary>;

    /// Full operation history for an account
    async fn get_operations(
        &self,
        address: &str,
        known_token_ids: &[String],
        wallet: &WalletContext,
    ) -> Result<OperationsResponse>;
}

/// Token registry
pub trait TokenMetadataService: Send + Sync {
    /// Start a metadata backfill for a token (fire-and-forget)
    fn search_metadata(&self, contract: &str, token_id: &str);

    /// Token ids already known locally (`contract:tokenId`)
    fn known_token_ids(&self) -> Vec<String>;

    /// Human-readable amount, e.g. `1.5 tez`
    fn format_amount(&self, token_id: &str, amount: &TokenAmount) -> String;
}

/// Address book / display-name service
pub trait LookupService: Send + Sync {
    /// Register an address for tracking (fire-and-forget)
    fn check(&self, address: &str);

    /// Display string for an address record
    fn resolve(&self, record: &AddressRecord) -> String;
}

/// User-facing notifications
pub trait NotificationService: Send + Sync {
    /// Show a success message
    fn add_success(&self, message: &str);
}

/// Wallet persistence
pub trait WalletStore: Send + Sync {
    /// Copy of the stored account, `None` if the wallet has no such account
    fn account(&self, address: &str) -> Result<Option<Account>>;

    /// Addresses of every account in the wallet
    fn account_addresses(&self) -> Vec<String>;

    /// Persist an updated account
    fn store_account(&self, account: &Account) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_indexer_json() {
        let summary: AccountSummary = serde_json::from_str(
            r#"{
                "counter": "1234",
                "tokens": [{"contract": "KT1x", "tokenId": 0, "balance": "100"}],
                "unknownTokenIds": ["KT1a:0"]
            }"#,
        )
        .unwrap();
        assert_eq!(summary.counter, "1234");
        assert_eq!(summary.tokens.unwrap()[0].key().to_string(), "KT1x:0");
        assert_eq!(summary.unknown_token_ids.unwrap(), vec!["KT1a:0"]);
    }

    #[test]
    fn test_summary_optional_fields() {
        let summary: AccountSummary = serde_json::from_str(r#"{"counter": "1"}"#).unwrap();
        assert!(summary.tokens.is_none());
        assert!(summary.unknown_token_ids.is_none());
    }

    #[test]
    fn test_operations_keep_raw_value() {
        let response: OperationsResponse =
            serde_json::from_str(r#"{"operations": {"error": "rate limited"}}"#).unwrap();
        assert!(response.operations.is_object());
    }
}
