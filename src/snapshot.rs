// Delta snapshot adapter.
//
// A snapshot (`delta.json`) is a JSON object from state keys to hex values:
//
//   "resource_group::0x<account>::0x1::object::ObjectGroup": "0x00f60102…"
//   "resource::0x<account>::0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>": "0x…"
//
// This module only selects values by key and hands them to the decoders;
// it knows nothing about how the snapshot was produced.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::io::parse_hex;
use crate::report::GroupReport;
use crate::resource::{AccountAddress, coin_store_balance_hex, decode_group_value};

pub const DEFAULT_COIN_TYPE: &str = "0x1::aptos_coin::AptosCoin";

const RESOURCE_GROUP_PREFIX: &str = "resource_group::";
const RESOURCE_PREFIX: &str = "resource::";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot root must be a JSON object")]
    NotAnObject,
}

// ---------------------------------------------------------------------------
// State keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateKey<'a> {
    ResourceGroup {
        address: AccountAddress,
        group_type: &'a str,
    },
    Resource {
        address: AccountAddress,
        resource_type: &'a str,
    },
    Other,
}

impl<'a> StateKey<'a> {
    pub fn parse(key: &'a str) -> Self {
        if let Some(rest) = key.strip_prefix(RESOURCE_GROUP_PREFIX) {
            if let Some((address, group_type)) = split_address(rest) {
                return Self::ResourceGroup {
                    address,
                    group_type,
                };
            }
        } else if let Some(rest) = key.strip_prefix(RESOURCE_PREFIX)
            && let Some((address, resource_type)) = split_address(rest)
        {
            return Self::Resource {
                address,
                resource_type,
            };
        }
        Self::Other
    }

    pub fn address(&self) -> Option<AccountAddress> {
        match *self {
            Self::ResourceGroup { address, .. } | Self::Resource { address, .. } => Some(address),
            Self::Other => None,
        }
    }
}

fn split_address(rest: &str) -> Option<(AccountAddress, &str)> {
    let (address, ty) = rest.split_once("::")?;
    let address = address.parse().ok()?;
    (!ty.is_empty()).then_some((address, ty))
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// State values of one snapshot, keyed and ordered by state key.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    values: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn from_json_str(text: &str) -> Result<Self, SnapshotError> {
        let root: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Object(map) = root else {
            return Err(SnapshotError::NotAnObject);
        };
        let mut values = BTreeMap::new();
        for (key, value) in map {
            match value {
                serde_json::Value::String(hex) => {
                    values.insert(key, hex);
                }
                other => log::debug!("skipping {key}: non-string value ({other})"),
            }
        }
        Ok(Self { values })
    }

    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Every account that owns at least one resource or resource group.
    pub fn accounts(&self) -> BTreeSet<AccountAddress> {
        self.values
            .keys()
            .filter_map(|k| StateKey::parse(k).address())
            .collect()
    }

    /// Decodes every resource group, optionally only those of `account`,
    /// in state-key order.
    pub fn resource_groups(&self, account: Option<&AccountAddress>) -> Vec<GroupReport> {
        let selected: Vec<(AccountAddress, &str, &str)> = self
            .values
            .iter()
            .filter_map(|(key, hex)| match StateKey::parse(key) {
                StateKey::ResourceGroup {
                    address,
                    group_type,
                } if account.is_none_or(|a| *a == address) => {
                    Some((address, group_type, hex.as_str()))
                }
                _ => None,
            })
            .collect();
        log::debug!(
            "decoding {} of {} snapshot values as resource groups",
            selected.len(),
            self.values.len()
        );

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            selected
                .par_iter()
                .map(|&(address, group_type, hex)| decode_located(address, group_type, hex))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            selected
                .iter()
                .map(|&(address, group_type, hex)| decode_located(address, group_type, hex))
                .collect()
        }
    }

    /// Balance of `account`'s `CoinStore<coin_type>`, or `None` when the
    /// account holds no such store or the value is too short to carry one.
    pub fn coin_balance(&self, account: &AccountAddress, coin_type: &str) -> Option<u64> {
        let wanted = format!("0x1::coin::CoinStore<{coin_type}>");
        self.values.iter().find_map(|(key, hex)| match StateKey::parse(key) {
            StateKey::Resource {
                address,
                resource_type,
            } if address == *account && resource_type == wanted => coin_store_balance_hex(hex),
            _ => None,
        })
    }
}

fn decode_located(address: AccountAddress, group_type: &str, hex: &str) -> GroupReport {
    match parse_hex(hex) {
        Ok(bytes) => {
            let mut decoded = decode_group_value(&bytes);
            decoded.group = decoded.group.located(address, group_type);
            GroupReport::from(&decoded)
        }
        Err(e) => GroupReport {
            group_address: Some(address.to_long_string()),
            group_type: Some(group_type.to_string()),
            error: Some(format!("invalid hex: {e}")),
            ..GroupReport::default()
        },
    }
}
