//! Presentation model for decoded resource groups.
//!
//! A [`GroupReport`] owns everything it shows (strings instead of borrowed
//! payload slices) so it can outlive the input buffer, be rendered as text,
//! or be serialised to JSON with the `json` feature. With `json` enabled an
//! opaque entry serialises as `{"raw": "0x…"}`.

use std::fmt;

use crate::io::{parse_hex, to_hex};
use crate::resource::{DecodedStruct, GroupDecode, ResourceGroupEntry, decode_group_value};

/// Typed fields of one entry, or its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum DecodedValue {
    ObjectCore {
        guid_creation_num: u64,
        owner: String,
        allow_ungated_transfer: bool,
    },
    FungibleStore {
        metadata: String,
        balance: u64,
        frozen: bool,
    },
    Raw(String),
}

impl From<DecodedStruct<'_>> for DecodedValue {
    fn from(decoded: DecodedStruct<'_>) -> Self {
        match decoded {
            DecodedStruct::ObjectCore(o) => Self::ObjectCore {
                guid_creation_num: o.guid_creation_num,
                owner: o.owner.to_long_string(),
                allow_ungated_transfer: o.allow_ungated_transfer,
            },
            DecodedStruct::FungibleStore(s) => Self::FungibleStore {
                metadata: s.metadata.to_long_string(),
                balance: s.balance,
                frozen: s.frozen,
            },
            DecodedStruct::Opaque(raw) => Self::Raw(to_hex(raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct EntryReport {
    /// `<address>::<module>::<struct>`.
    pub struct_tag: String,
    pub decoded: DecodedValue,
    /// Set when a known struct was truncated and `decoded` fell back to raw.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl From<&ResourceGroupEntry<'_>> for EntryReport {
    fn from(entry: &ResourceGroupEntry<'_>) -> Self {
        let struct_tag = entry.tag.to_string();
        match entry.decode() {
            Ok(decoded) => Self {
                struct_tag,
                decoded: decoded.into(),
                error: None,
            },
            Err(e) => {
                log::warn!("{struct_tag}: {e}; showing raw bytes");
                Self {
                    struct_tag,
                    decoded: DecodedValue::Raw(to_hex(entry.payload)),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct GroupReport {
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub group_address: Option<String>,
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub group_type: Option<String>,
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub envelope: Option<String>,
    pub declared_count: u64,
    pub entries: Vec<EntryReport>,
    pub trailing_bytes: usize,
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl GroupReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

impl From<&GroupDecode<'_>> for GroupReport {
    fn from(decoded: &GroupDecode<'_>) -> Self {
        let group = &decoded.group;
        Self {
            group_address: group.address.map(|a| a.to_long_string()),
            group_type: group.group_type.clone(),
            envelope: group.envelope.map(|k| k.as_str().to_string()),
            declared_count: group.declared_count,
            entries: group.entries.iter().map(EntryReport::from).collect(),
            trailing_bytes: group.trailing.len(),
            error: decoded.error.map(|e| e.to_string()),
        }
    }
}

/// Decodes one snapshot value given as hex (`0x` optional).
pub fn decode_group_hex(hex: &str) -> Result<GroupReport, hex::FromHexError> {
    let bytes = parse_hex(hex)?;
    Ok(GroupReport::from(&decode_group_value(&bytes)))
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectCore {
                guid_creation_num,
                owner,
                allow_ungated_transfer,
            } => {
                writeln!(f, "    guid_creation_num:      {guid_creation_num}")?;
                writeln!(f, "    owner:                  {owner}")?;
                writeln!(f, "    allow_ungated_transfer: {allow_ungated_transfer}")
            }
            Self::FungibleStore {
                metadata,
                balance,
                frozen,
            } => {
                writeln!(f, "    metadata: {metadata}")?;
                writeln!(f, "    balance:  {balance}")?;
                writeln!(f, "    frozen:   {frozen}")
            }
            Self::Raw(hex) => writeln!(f, "    raw: {hex}"),
        }
    }
}

impl fmt::Display for GroupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.group_type, &self.group_address) {
            (Some(ty), Some(addr)) => writeln!(f, "resource group {ty} at {addr}")?,
            (Some(ty), None) => writeln!(f, "resource group {ty}")?,
            _ => writeln!(f, "resource group")?,
        }
        if let Some(kind) = &self.envelope {
            writeln!(f, "write op: {kind}")?;
        }
        writeln!(
            f,
            "entries: {} (declared {})",
            self.entries.len(),
            self.declared_count
        )?;
        for (i, entry) in self.entries.iter().enumerate() {
            writeln!(f, "[{i}] {}", entry.struct_tag)?;
            if let Some(e) = &entry.error {
                writeln!(f, "    error: {e}")?;
            }
            write!(f, "{}", entry.decoded)?;
        }
        if self.trailing_bytes > 0 {
            writeln!(f, "trailing: {} bytes", self.trailing_bytes)?;
        }
        if let Some(e) = &self.error {
            writeln!(f, "error: {e}")?;
        }
        Ok(())
    }
}
