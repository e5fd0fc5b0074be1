//! Wallet account state as seen by the sync engine

use crate::{Activity, TokenKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of leading characters kept by [`Account::short_address`]
const SHORT_ADDRESS_HEAD: usize = 6;
/// Number of trailing characters kept by [`Account::short_address`]
const SHORT_ADDRESS_TAIL: usize = 4;

/// Wallet account.
///
/// Owned by the wallet store. The sync engine loads a copy, mutates it and
/// hands it back for persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// tz/KT1 address
    pub address: String,
    /// Last indexer counter seen for this account; empty until the first sync
    #[serde(default)]
    pub state: String,
    /// Activity history, newest first as delivered by the indexer
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Token balances keyed by `contract:tokenId`, decimal strings
    #[serde(default)]
    pub token_balances: BTreeMap<String, String>,
}

impl Account {
    /// Create a never-synced account
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// True once the account went through at least one full fetch
    pub fn is_synced(&self) -> bool {
        !self.state.is_empty()
    }

    /// Truncated address for display (`tz1abc...wxyz`)
    pub fn short_address(&self) -> String {
        let chars: Vec<char> = self.address.chars().collect();
        if chars.len() <= SHORT_ADDRESS_HEAD + SHORT_ADDRESS_TAIL {
            return self.address.clone();
        }
        let head: String = chars[..SHORT_ADDRESS_HEAD].iter().collect();
        let tail: String = chars[chars.len() - SHORT_ADDRESS_TAIL..].iter().collect();
        format!("{}...{}", head, tail)
    }

    /// Upsert a token balance; last write wins
    pub fn update_token_balance(&mut self, key: &TokenKey, balance: String) {
        self.token_balances.insert(key.to_string(), balance);
    }

    /// Balance for a `contract:tokenId` key
    pub fn token_balance(&self, key: &str) -> Option<&str> {
        self.token_balances.get(key).map(String::as_str)
    }

    /// Activity with the given operation hash
    pub fn find_activity(&self, hash: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.hash == hash)
    }
}
