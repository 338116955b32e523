// Resource-group decoder.
//
// A resource group packs several typed resources of one account into a
// single value:
//
//   count     ULEB128
//   entry*    struct tag | payload length (ULEB128) | payload
//   trailing  any bytes after `count` entries (reported, not interpreted)
//
// Decoding never reads past the buffer. On failure the entries parsed so far
// are kept and returned next to a `GroupError` that locates the fault.
//
// Snapshot values may wrap the group in a write-op envelope. Offsets in
// entries and errors always refer to the bytes the caller passed in, so they
// line up with a hex dump of the same input.

use thiserror::Error;

use super::address::AccountAddress;
use super::known::{DecodedStruct, TruncatedStruct, dispatch};
use super::tag::{StructTag, TagError};
use super::write_op::{WriteOpKind, WriteOpValue};
use crate::bcs::{ByteCursor, ReadError};

/// Smallest possible encoded entry: address + two empty names + zero length.
const MIN_ENTRY_LEN: usize = 32 + 1 + 1 + 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why decoding stopped before all declared entries were read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("entry count: {0}")]
    Count(ReadError),

    #[error("entry {index} at offset {offset}: {source}")]
    Tag {
        index: usize,
        offset: usize,
        #[source]
        source: TagError,
    },

    #[error("entry {index}: data length at offset {offset}: {source}")]
    Length {
        index: usize,
        offset: usize,
        #[source]
        source: ReadError,
    },

    #[error(
        "entry {index}: truncated payload at offset {offset}: \
         expected {expected} bytes, {available} available"
    )]
    TruncatedEntry {
        index: usize,
        offset: usize,
        expected: u64,
        available: usize,
    },

    #[error(
        "write op declares {expected} bytes of data, {available} available \
         (value ends at offset {offset})"
    )]
    TruncatedValue {
        offset: usize,
        expected: u64,
        available: usize,
    },

    #[error("value is not a Creation or Modification write op")]
    NotWriteOp,
}

impl GroupError {
    /// Index of the entry that failed, if the failure was inside an entry.
    pub fn entry_index(&self) -> Option<usize> {
        match *self {
            Self::Count(_) | Self::TruncatedValue { .. } | Self::NotWriteOp => None,
            Self::Tag { index, .. }
            | Self::Length { index, .. }
            | Self::TruncatedEntry { index, .. } => Some(index),
        }
    }

    /// Byte offset where the failing read started.
    pub fn offset(&self) -> usize {
        match *self {
            Self::Count(e) => e.offset(),
            Self::Tag { offset, .. }
            | Self::Length { offset, .. }
            | Self::TruncatedEntry { offset, .. }
            | Self::TruncatedValue { offset, .. } => offset,
            Self::NotWriteOp => 0,
        }
    }

    /// The same error for group bytes found `by` bytes into the input.
    fn shifted(self, by: usize) -> Self {
        match self {
            Self::Count(e) => Self::Count(e.shifted(by)),
            Self::Tag {
                index,
                offset,
                source,
            } => Self::Tag {
                index,
                offset: offset + by,
                source: TagError {
                    field: source.field,
                    source: source.source.shifted(by),
                },
            },
            Self::Length {
                index,
                offset,
                source,
            } => Self::Length {
                index,
                offset: offset + by,
                source: source.shifted(by),
            },
            Self::TruncatedEntry {
                index,
                offset,
                expected,
                available,
            } => Self::TruncatedEntry {
                index,
                offset: offset + by,
                expected,
                available,
            },
            Self::TruncatedValue {
                offset,
                expected,
                available,
            } => Self::TruncatedValue {
                offset: offset + by,
                expected,
                available,
            },
            Self::NotWriteOp => Self::NotWriteOp,
        }
    }
}

/// How a snapshot value frames its group bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueFraming {
    /// Unwrap a write-op envelope when the bytes are one, else read them bare.
    #[default]
    Auto,
    /// The value must be a Creation or Modification write op.
    WriteOp,
    /// The value is the group bytes themselves.
    Bare,
}

// ---------------------------------------------------------------------------
// Data model
// ---------------------------------------------------------------------------

/// One resource packed in a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroupEntry<'a> {
    pub tag: StructTag,
    pub payload: &'a [u8],
    /// Offset of the entry's struct tag within the decoded input.
    pub offset: usize,
}

impl<'a> ResourceGroupEntry<'a> {
    /// Type-directed decode of the payload.
    pub fn decode(&self) -> Result<DecodedStruct<'a>, TruncatedStruct> {
        dispatch(&self.tag, self.payload)
    }
}

/// Entries of one resource group, in encoder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceGroup<'a> {
    /// Owning account, when known from the state key.
    pub address: Option<AccountAddress>,
    /// Group type from the state key, e.g. `0x1::object::ObjectGroup`.
    pub group_type: Option<String>,
    /// Write operation the group bytes were wrapped in, if any.
    pub envelope: Option<WriteOpKind>,
    /// Entry count as declared by the encoder.
    pub declared_count: u64,
    pub entries: Vec<ResourceGroupEntry<'a>>,
    /// Unparsed bytes after the declared entries.
    pub trailing: &'a [u8],
}

impl ResourceGroup<'_> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attaches the state-key location of this group.
    pub fn located(mut self, address: AccountAddress, group_type: impl Into<String>) -> Self {
        self.address = Some(address);
        self.group_type = Some(group_type.into());
        self
    }
}

/// A group decode: everything parsed, plus the reason it stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDecode<'a> {
    pub group: ResourceGroup<'a>,
    pub error: Option<GroupError>,
}

impl<'a> GroupDecode<'a> {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Decoded cleanly with every declared entry and nothing left over.
    pub fn is_exact(&self) -> bool {
        self.is_complete()
            && self.group.trailing.is_empty()
            && self.group.len() as u64 == self.group.declared_count
    }

    fn shifted(mut self, by: usize) -> Self {
        for entry in &mut self.group.entries {
            entry.offset += by;
        }
        self.error = self.error.map(|e| e.shifted(by));
        self
    }

    /// Drops the partial entries when decoding failed.
    pub fn into_result(self) -> Result<ResourceGroup<'a>, GroupError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.group),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decodes the bytes of one resource group.
///
/// An empty buffer is an empty group.
pub fn decode_resource_group(bytes: &[u8]) -> GroupDecode<'_> {
    let mut group = ResourceGroup::default();
    if bytes.is_empty() {
        return GroupDecode { group, error: None };
    }

    let mut c = ByteCursor::new(bytes);
    let count = match c.read_uleb128() {
        Ok(n) => n,
        Err(e) => {
            return GroupDecode {
                group,
                error: Some(GroupError::Count(e)),
            };
        }
    };
    group.declared_count = count;

    // Bound the allocation by what the buffer could possibly hold.
    let max_entries = c.remaining() / MIN_ENTRY_LEN;
    group.entries.reserve(usize::try_from(count).unwrap_or(usize::MAX).min(max_entries));

    let mut error = None;
    let mut index = 0usize;
    while (index as u64) < count && !c.is_empty() {
        match read_entry(&mut c, index) {
            Ok(entry) => {
                log::trace!(
                    "entry {index}: {} ({} bytes) at offset {}",
                    entry.tag,
                    entry.payload.len(),
                    entry.offset
                );
                group.entries.push(entry);
            }
            Err(e) => {
                log::debug!("resource group decode stopped: {e}");
                error = Some(e);
                break;
            }
        }
        index += 1;
    }

    if error.is_none() {
        if (group.entries.len() as u64) < count {
            log::debug!(
                "resource group declares {count} entries, buffer held {}",
                group.entries.len()
            );
        }
        group.trailing = c.rest();
        if !group.trailing.is_empty() {
            log::debug!(
                "{} trailing bytes after {} entries at offset {}",
                group.trailing.len(),
                group.entries.len(),
                c.position()
            );
        }
    }

    GroupDecode { group, error }
}

/// Decodes a snapshot value, detecting a write-op envelope.
///
/// Same as [`decode_value`] with [`ValueFraming::Auto`].
pub fn decode_group_value(bytes: &[u8]) -> GroupDecode<'_> {
    decode_value(bytes, ValueFraming::Auto)
}

/// Decodes a snapshot value framed as `framing` says.
///
/// With [`ValueFraming::Auto`] an exact envelope around a group that decodes
/// exactly (every entry, no trailing bytes) is unwrapped. Otherwise bytes
/// that decode exactly as a bare group are taken as one. Only then is a
/// remaining envelope shape, usually a value cut short, unwrapped. A truncated envelope always yields an error, even
/// when the bytes present happen to end on an entry boundary.
pub fn decode_value(bytes: &[u8], framing: ValueFraming) -> GroupDecode<'_> {
    match framing {
        ValueFraming::Bare => decode_resource_group(bytes),
        ValueFraming::WriteOp => match WriteOpValue::parse(bytes) {
            Some(op) => decode_write_op(op),
            None => GroupDecode {
                group: ResourceGroup::default(),
                error: Some(GroupError::NotWriteOp),
            },
        },
        ValueFraming::Auto => {
            let Some(op) = WriteOpValue::parse(bytes) else {
                return decode_resource_group(bytes);
            };
            let unwrapped = if op.is_exact() {
                let decoded = decode_write_op(op);
                if decoded.is_exact() {
                    return decoded;
                }
                Some(decoded)
            } else {
                None
            };
            let bare = decode_resource_group(bytes);
            if bare.is_exact() {
                log::debug!("value decodes as a bare group; not unwrapping {} write op", op.kind);
                return bare;
            }
            unwrapped.unwrap_or_else(|| decode_write_op(op))
        }
    }
}

fn decode_write_op(op: WriteOpValue<'_>) -> GroupDecode<'_> {
    log::trace!("{} write op wrapping {} bytes", op.kind, op.declared_len);
    let mut decoded = decode_resource_group(op.data);
    decoded.group.envelope = Some(op.kind);
    if op.is_truncated() && decoded.error.is_none() {
        decoded.error = Some(GroupError::TruncatedValue {
            offset: op.data.len(),
            expected: op.declared_len,
            available: op.data.len(),
        });
    }
    decoded.shifted(op.header_len)
}

fn read_entry<'a>(c: &mut ByteCursor<'a>, index: usize) -> Result<ResourceGroupEntry<'a>, GroupError> {
    let offset = c.position();
    let tag = StructTag::read(c).map_err(|source| GroupError::Tag {
        index,
        offset,
        source,
    })?;

    let len_offset = c.position();
    let len = c.read_uleb128().map_err(|source| GroupError::Length {
        index,
        offset: len_offset,
        source,
    })?;

    let available = c.remaining();
    let payload_offset = c.position();
    let truncated = GroupError::TruncatedEntry {
        index,
        offset: payload_offset,
        expected: len,
        available,
    };
    if len > available as u64 {
        return Err(truncated);
    }
    let payload = c
        .read_fixed_bytes(len as usize)
        .map_err(|_| truncated)?;

    Ok(ResourceGroupEntry {
        tag,
        payload,
        offset,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
