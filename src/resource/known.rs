// Type-directed decoding of framework resources.
//
// Dispatch is a closed match on `(module, struct)`. Anything outside the
// registry is returned as opaque bytes; that is a normal outcome, not an error.
//
// Fixed layouts (BCS, little-endian):
//
//   object::ObjectCore           guid_creation_num u64 | owner [u8; 32] | allow_ungated_transfer bool
//   fungible_asset::FungibleStore metadata [u8; 32]   | balance u64      | frozen bool
//
// Bytes after the last documented field are ignored.

use thiserror::Error;

use super::address::{ADDRESS_LEN, AccountAddress};
use super::tag::StructTag;
use crate::bcs::{ByteCursor, ReadError};

/// A known struct's payload ended before one of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "truncated {struct_name}: missing field `{field}` at offset {offset} \
     (need {needed} bytes, {available} available)"
)]
pub struct TruncatedStruct {
    pub struct_name: &'static str,
    pub field: &'static str,
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

impl TruncatedStruct {
    fn at(struct_name: &'static str, field: &'static str, e: ReadError) -> Self {
        let (offset, needed, available) = match e {
            ReadError::Truncated {
                offset,
                needed,
                available,
            } => (offset, needed, available),
            ReadError::TruncatedVarint { offset } | ReadError::VarintOverflow { offset } => {
                (offset, 1, 0)
            }
        };
        Self {
            struct_name,
            field,
            offset,
            needed,
            available,
        }
    }
}

fn missing(
    struct_name: &'static str,
    field: &'static str,
) -> impl Fn(ReadError) -> TruncatedStruct {
    move |e| TruncatedStruct::at(struct_name, field, e)
}

/// `0x1::object::ObjectCore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectCore {
    pub guid_creation_num: u64,
    pub owner: AccountAddress,
    pub allow_ungated_transfer: bool,
}

impl ObjectCore {
    pub const NAME: &'static str = "ObjectCore";

    pub fn decode(payload: &[u8]) -> Result<Self, TruncatedStruct> {
        let mut c = ByteCursor::new(payload);
        let guid_creation_num = c
            .read_u64_le()
            .map_err(missing(Self::NAME, "guid_creation_num"))?;
        let owner = c
            .read_array::<ADDRESS_LEN>()
            .map_err(missing(Self::NAME, "owner"))?;
        let allow_ungated_transfer = c
            .read_bool()
            .map_err(missing(Self::NAME, "allow_ungated_transfer"))?;
        Ok(Self {
            guid_creation_num,
            owner: AccountAddress::new(owner),
            allow_ungated_transfer,
        })
    }
}

/// `0x1::fungible_asset::FungibleStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FungibleStore {
    pub metadata: AccountAddress,
    pub balance: u64,
    pub frozen: bool,
}

impl FungibleStore {
    pub const NAME: &'static str = "FungibleStore";

    pub fn decode(payload: &[u8]) -> Result<Self, TruncatedStruct> {
        let mut c = ByteCursor::new(payload);
        let metadata = c
            .read_array::<ADDRESS_LEN>()
            .map_err(missing(Self::NAME, "metadata"))?;
        let balance = c.read_u64_le().map_err(missing(Self::NAME, "balance"))?;
        let frozen = c.read_bool().map_err(missing(Self::NAME, "frozen"))?;
        Ok(Self {
            metadata: AccountAddress::new(metadata),
            balance,
            frozen,
        })
    }
}

/// Registry of struct types with a dedicated decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownStruct {
    ObjectCore,
    FungibleStore,
}

impl KnownStruct {
    /// Looks up `(module, struct)`; comparison is case-sensitive.
    pub fn lookup(module: &str, name: &str) -> Option<Self> {
        match (module, name) {
            ("object", ObjectCore::NAME) => Some(Self::ObjectCore),
            ("fungible_asset", FungibleStore::NAME) => Some(Self::FungibleStore),
            _ => None,
        }
    }

    pub fn decode<'a>(self, payload: &'a [u8]) -> Result<DecodedStruct<'a>, TruncatedStruct> {
        match self {
            Self::ObjectCore => ObjectCore::decode(payload).map(DecodedStruct::ObjectCore),
            Self::FungibleStore => FungibleStore::decode(payload).map(DecodedStruct::FungibleStore),
        }
    }
}

/// Result of dispatching one resource payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedStruct<'a> {
    ObjectCore(ObjectCore),
    FungibleStore(FungibleStore),
    /// Unrecognised type; the payload unmodified.
    Opaque(&'a [u8]),
}

/// Routes a payload to its decoder by tag, or passes it through as opaque.
pub fn dispatch<'a>(tag: &StructTag, payload: &'a [u8]) -> Result<DecodedStruct<'a>, TruncatedStruct> {
    let (module, name) = tag.dispatch_key();
    match KnownStruct::lookup(module, name) {
        Some(known) => known.decode(payload),
        None => Ok(DecodedStruct::Opaque(payload)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_core_bytes() -> Vec<u8> {
        let mut out = 0x4_0000_0000_0000u64.to_le_bytes().to_vec();
        out.extend_from_slice(&[0xab; 32]);
        out.push(1);
        out
    }

    #[test]
    fn object_core_fields() {
        let decoded = ObjectCore::decode(&object_core_bytes()).unwrap();
        assert_eq!(decoded.guid_creation_num, 0x4_0000_0000_0000);
        assert_eq!(decoded.owner, AccountAddress::new([0xab; 32]));
        assert!(decoded.allow_ungated_transfer);
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = object_core_bytes();
        let exact = ObjectCore::decode(&bytes).unwrap();
        bytes.extend_from_slice(&[0xee; 48]);
        assert_eq!(ObjectCore::decode(&bytes).unwrap(), exact);
    }

    #[test]
    fn fungible_store_fields() {
        let mut bytes = vec![0x0a; 32];
        bytes.extend_from_slice(&1_000_000u64.to_le_bytes());
        bytes.push(0);
        let decoded = FungibleStore::decode(&bytes).unwrap();
        assert_eq!(decoded.metadata, AccountAddress::new([0x0a; 32]));
        assert_eq!(decoded.balance, 1_000_000);
        assert!(!decoded.frozen);
    }

    #[test]
    fn truncation_names_missing_field() {
        let bytes = object_core_bytes();
        let err = ObjectCore::decode(&bytes[..20]).unwrap_err();
        assert_eq!(err.struct_name, "ObjectCore");
        assert_eq!(err.field, "owner");
        assert_eq!((err.offset, err.needed, err.available), (8, 32, 12));

        let err = ObjectCore::decode(&bytes[..40]).unwrap_err();
        assert_eq!(err.field, "allow_ungated_transfer");

        let err = FungibleStore::decode(&[0; 35]).unwrap_err();
        assert_eq!(err.field, "balance");

        let err = FungibleStore::decode(&[]).unwrap_err();
        assert_eq!(err.field, "metadata");
    }

    #[test]
    fn dispatch_ignores_address() {
        let bytes = object_core_bytes();
        let tag = StructTag::new(AccountAddress::new([7; 32]), "object", "ObjectCore");
        assert!(matches!(
            dispatch(&tag, &bytes),
            Ok(DecodedStruct::ObjectCore(_))
        ));
    }

    #[test]
    fn dispatch_is_case_sensitive() {
        let bytes = object_core_bytes();
        let tag = StructTag::new(AccountAddress::ONE, "object", "objectcore");
        assert_eq!(dispatch(&tag, &bytes), Ok(DecodedStruct::Opaque(&bytes[..])));
    }

    #[test]
    fn unknown_type_is_opaque() {
        let payload = [1u8, 2, 3];
        let tag = StructTag::new(AccountAddress::ONE, "coin", "CoinStore");
        assert_eq!(dispatch(&tag, &payload), Ok(DecodedStruct::Opaque(&payload[..])));
    }

    #[test]
    fn dispatch_is_repeatable() {
        let bytes = object_core_bytes();
        let tag = StructTag::new(AccountAddress::ONE, "object", "ObjectCore");
        assert_eq!(dispatch(&tag, &bytes), dispatch(&tag, &bytes));
    }
}
