// 32-byte account address.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const ADDRESS_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddressError {
    #[error("address has {0} hex digits, at most 64 allowed")]
    TooLong(usize),
    #[error("empty address")]
    Empty,
    #[error("invalid hex in address: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// On-chain account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountAddress([u8; ADDRESS_LEN]);

impl AccountAddress {
    pub const ONE: Self = {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 1] = 1;
        Self(bytes)
    };

    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// `0x` followed by all 64 hex digits.
    pub fn to_long_string(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// `0x` followed by the hex digits with leading zeros stripped (`0x1`).
    pub fn to_short_string(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }
}

/// Parses `0x`-prefixed or bare hex, left-padding short forms (`0x1`).
impl FromStr for AccountAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(AddressError::Empty);
        }
        if digits.len() > ADDRESS_LEN * 2 {
            return Err(AddressError::TooLong(digits.len()));
        }
        let padded = format!("{digits:0>64}");
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(padded, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_long_string())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_short_string())
    }
}
