//! Reverse domain lookup contract

use crate::Result;
use async_trait::async_trait;

/// Reverse lookup against a domain name service (e.g. Tezos Domains).
#[async_trait]
pub trait DomainResolver: Send + Sync {
    /// Domain registered for `address`, or an empty string when there is none
    async fn domain_from_address(&self, address: &str) -> Result<String>;
}
