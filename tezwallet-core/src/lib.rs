//! Tezos wallet core model
//!
//! Accounts, indexer activity records and token balance types shared by the
//! alias cache and the activity sync engine.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod activity;
pub mod error;
pub mod token;

pub use account::Account;
pub use activity::{Activity, ActivityKind, AddressRecord, STATUS_PENDING};
pub use error::{Error, ErrorCategory, Result};
pub use token::{TokenAmount, TokenBalanceUpdate, TokenKey, TOKEN_KEY_SEPARATOR};
