//! Indexer activity records

use crate::TokenAmount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code the indexer uses for operations that are not yet included in a block
pub const STATUS_PENDING: i32 = 0;

/// Operation kind.
///
/// The tag set is open: kinds this crate does not know about are kept verbatim
/// in [`ActivityKind::Other`] so they survive a store/load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityKind {
    /// Tez or token transfer
    Transaction,
    /// Baker delegation change
    Delegation,
    /// Contract origination
    Origination,
    /// Fundraiser account activation
    Activation,
    /// Any other indexer tag
    Other(String),
}

impl ActivityKind {
    /// Wire tag
    pub fn as_str(&self) -> &str {
        match self {
            Self::Transaction => "transaction",
            Self::Delegation => "delegation",
            Self::Origination => "origination",
            Self::Activation => "activation",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for ActivityKind {
    fn from(tag: &str) -> Self {
        match tag {
            "transaction" => Self::Transaction,
            "delegation" => Self::Delegation,
            "origination" => Self::Origination,
            "activation" => Self::Activation,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ActivityKind {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ActivityKind> for String {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of one side of an operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// tz/KT1 address, empty when there is no counterparty
    #[serde(default)]
    pub address: String,
    /// Alias attached by the indexer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl AddressRecord {
    /// Create record for an address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            alias: None,
        }
    }

    /// Record standing for "no counterparty" (e.g. undelegation)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// True when no address is set
    pub fn is_empty(&self) -> bool {
        self.address.is_empty()
    }
}

/// One on-chain operation as reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Operation hash, unique within one account's history
    pub hash: String,
    /// Operation kind
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Status code; [`STATUS_PENDING`] means unconfirmed
    #[serde(default)]
    pub status: i32,
    /// Operation time
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Sender
    #[serde(default)]
    pub source: Option<AddressRecord>,
    /// Receiver, delegate or originated contract
    #[serde(default)]
    pub destination: Option<AddressRecord>,
    /// Raw amount (transactions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<TokenAmount>,
    /// Token the amount is denominated in (transactions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
}

impl Activity {
    /// Create a bare activity of the given kind
    pub fn new(hash: impl Into<String>, kind: ActivityKind) -> Self {
        Self {
            hash: hash.into(),
            kind,
            status: STATUS_PENDING,
            timestamp: None,
            source: None,
            destination: None,
            amount: None,
            token_id: None,
        }
    }

    /// Set status
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Set timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set source address
    pub fn with_source(mut self, address: impl Into<String>) -> Self {
        self.source = Some(AddressRecord::new(address));
        self
    }

    /// Set destination address
    pub fn with_destination(mut self, address: impl Into<String>) -> Self {
        self.destination = Some(AddressRecord::new(address));
        self
    }

    /// Set amount and token
    pub fn with_amount(mut self, amount: impl Into<TokenAmount>, token_id: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self.token_id = Some(token_id.into());
        self
    }

    /// True while the operation is unconfirmed
    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }

    /// Source address, if any
    pub fn source_address(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.address.as_str())
    }

    /// Destination address, if any
    pub fn destination_address(&self) -> Option<&str> {
        self.destination.as_ref().map(|d| d.address.as_str())
    }
}
