//! Domain alias resolution for wallet addresses
//!
//! Caches the reverse (address -> domain) lookups of a domain name service.
//! Negative results are cached too, and a periodic sweep drops them so they
//! get retried later.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod cancel;
pub mod resolver;
pub mod store;

pub use cache::{AliasCache, AliasCacheConfig, FetchOutcome, SweepHandle};
pub use cancel::CancelToken;
pub use resolver::DomainResolver;
pub use store::{AliasStore, JsonFileAliasStore, MemoryAliasStore, ALIAS_STORAGE_KEY};

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Resolution error
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Snapshot storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
