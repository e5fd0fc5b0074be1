//! Token identifiers, raw amounts and indexer balance reports

use crate::{Error, Result};
use num_bigint::BigInt;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Separator between contract address and numeric token id
pub const TOKEN_KEY_SEPARATOR: char = ':';

/// Composite token identifier (`contract:tokenId`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenKey {
    /// FA1.2/FA2 contract address (KT1...)
    pub contract: String,
    /// Numeric token id inside the contract
    pub token_id: String,
}

impl TokenKey {
    /// Create new key
    pub fn new(contract: impl Into<String>, token_id: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            token_id: token_id.into(),
        }
    }
}

impl FromStr for TokenKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(TOKEN_KEY_SEPARATOR) {
            Some((contract, token_id)) if !contract.is_empty() && !token_id.is_empty() => {
                Ok(Self::new(contract, token_id))
            }
            _ => Err(Error::InvalidTokenId(s.to_string())),
        }
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.contract, TOKEN_KEY_SEPARATOR, self.token_id)
    }
}

/// Raw on-chain integer amount.
///
/// Balances of FA2 tokens routinely exceed `u64`, so the value is kept as a
/// big integer. The indexer may report it either as a JSON number or as a
/// decimal string; it is always serialized back as a string.
///
/// Numbers beyond `u64` arrive as floats and are accepted when integral.
/// Only the string form is exact past 2^53.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(BigInt);

impl TokenAmount {
    /// Wrap a big integer
    pub fn new(value: BigInt) -> Self {
        Self(value)
    }

    /// Borrow the underlying integer
    pub fn as_big_int(&self) -> &BigInt {
        &self.0
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<i64> for TokenAmount {
    fn from(value: i64) -> Self {
        Self(BigInt::from(value))
    }
}

impl FromStr for TokenAmount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<BigInt>()
            .map(Self)
            .map_err(|_| Error::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = TokenAmount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a decimal integer string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                Ok(TokenAmount::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                Ok(TokenAmount::from(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
                if !v.is_finite() || v.fract() != 0.0 {
                    return Err(E::custom(format!("amount is not an integer: {}", v)));
                }
                format!("{:.0}", v).parse().map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Accepts a token id reported either as a JSON string or a JSON integer.
fn string_or_integer<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a token id string or integer")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Token balance reported by the indexer for one sync pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalanceUpdate {
    /// Token contract address
    pub contract: String,
    /// Numeric token id inside the contract
    #[serde(alias = "tokenId", deserialize_with = "string_or_integer")]
    pub token_id: String,
    /// Current balance
    pub balance: TokenAmount,
}

impl TokenBalanceUpdate {
    /// Create new update
    pub fn new(
        contract: impl Into<String>,
        token_id: impl Into<String>,
        balance: impl Into<TokenAmount>,
    ) -> Self {
        Self {
            contract: contract.into(),
            token_id: token_id.into(),
            balance: balance.into(),
        }
    }

    /// Composite key under which the balance is stored on the account
    pub fn key(&self) -> TokenKey {
        TokenKey::new(self.contract.clone(), self.token_id.clone())
    }
}
