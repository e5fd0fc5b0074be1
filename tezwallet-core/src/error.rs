//! Error types for the wallet model

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Wallet model errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Token identifier is not `contract:tokenId`
    #[error("Invalid token id: {0}")]
    InvalidTokenId(String),

    /// Amount is not an integer
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidTokenId(_) | Error::InvalidAmount(_) => ErrorCategory::Token,
            Error::Serialization(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Token-related errors
    Token,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Token => write!(f, "Token"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}
