//! Error types for sync operations

/// Result type
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Wallet has no account for the address
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Indexer unreachable or erroring
    #[error("Indexer error: {0}")]
    Indexer(String),

    /// Wallet persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Indexer answered with data that does not decode
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Model error
    #[error("Core error: {0}")]
    Core(#[from] tezwallet_core::Error),
}

impl SyncError {
    /// Short machine-readable tag used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::AccountNotFound(_) => "account_not_found",
            SyncError::Indexer(_) => "indexer",
            SyncError::Storage(_) => "storage",
            SyncError::MalformedResponse(_) => "malformed_response",
            SyncError::Core(_) => "core",
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::MalformedResponse(e.to_string())
    }
}
