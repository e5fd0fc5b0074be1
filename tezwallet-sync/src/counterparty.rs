//! Counterparty derivation and display-name resolution

use crate::services::LookupService;
use std::sync::Arc;
use tezwallet_core::{Account, Activity, ActivityKind, AddressRecord};
use tezwallet_names::AliasCache;

/// The "other party" of an activity relative to `account`.
///
/// Delegations point at the delegate (empty when undelegating). Transactions
/// and originations point at whichever side is not the account; a
/// self-transfer yields the account itself. Other kinds have no counterparty.
pub fn counterparty(activity: &Activity, account: &Account) -> AddressRecord {
    let record = match activity.kind {
        ActivityKind::Delegation => activity.destination.as_ref(),
        ActivityKind::Transaction | ActivityKind::Origination => {
            if activity.source_address() == Some(account.address.as_str()) {
                activity.destination.as_ref()
            } else {
                activity.source.as_ref()
            }
        }
        _ => None,
    };
    record.cloned().unwrap_or_else(AddressRecord::empty)
}

/// Resolves counterparties to raw addresses or display names
#[derive(Clone)]
pub struct CounterpartyResolver {
    aliases: AliasCache,
    lookup: Arc<dyn LookupService>,
}

impl CounterpartyResolver {
    /// Create new resolver
    pub fn new(aliases: AliasCache, lookup: Arc<dyn LookupService>) -> Self {
        Self { aliases, lookup }
    }

    /// Counterparty of `activity`, as a raw address or a display name.
    ///
    /// With alias lookup, a resolved domain from the alias cache wins over the
    /// lookup service's display string.
    pub fn resolve_counterparty_address(
        &self,
        activity: &Activity,
        account: &Account,
        with_alias_lookup: bool,
    ) -> String {
        let record = counterparty(activity, account);
        if !with_alias_lookup || record.is_empty() {
            return record.address;
        }
        self.aliases
            .resolved_alias(&record.address)
            .unwrap_or_else(|| self.lookup.resolve(&record))
    }

    /// Display name of the counterparty (alias lookup enabled)
    pub fn display_name(&self, activity: &Activity, account: &Account) -> String {
        self.resolve_counterparty_address(activity, account, true)
    }

    /// Warm the alias cache for `address` in the background
    pub fn prefetch_alias(&self, address: &str) {
        self.aliases.prefetch_alias(address);
    }

    /// Alias cache backing this resolver
    pub fn aliases(&self) -> &AliasCache {
        &self.aliases
    }
}
