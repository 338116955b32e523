// Struct tag: publishing address + module name + struct name.
//
// Wire layout inside a resource group:
//
//   address      32 bytes
//   module_len   1 byte (raw length, not ULEB128)
//   module       module_len bytes, UTF-8
//   name_len     1 byte
//   name         name_len bytes, UTF-8

use std::fmt;

use thiserror::Error;

use super::address::{ADDRESS_LEN, AccountAddress};
use crate::bcs::{ByteCursor, ReadError};

/// A struct tag field ran past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("struct tag {field}: {source}")]
pub struct TagError {
    pub field: &'static str,
    #[source]
    pub source: ReadError,
}

/// Fully-qualified resource type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
}

impl StructTag {
    pub fn new(address: AccountAddress, module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address,
            module: module.into(),
            name: name.into(),
        }
    }

    /// Parses one tag at the cursor.
    ///
    /// Names that are not valid UTF-8 are decoded lossily; they never match
    /// a known struct, so the entry falls through to the opaque case.
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, TagError> {
        let address = cursor
            .read_array::<ADDRESS_LEN>()
            .map_err(|source| TagError {
                field: "address",
                source,
            })?;
        let module = read_name(cursor, "module")?;
        let name = read_name(cursor, "struct name")?;
        Ok(Self {
            address: AccountAddress::new(address),
            module,
            name,
        })
    }

    /// `(module, struct)` pair used for dispatch; the address is ignored.
    pub fn dispatch_key(&self) -> (&str, &str) {
        (&self.module, &self.name)
    }
}

fn read_name(cursor: &mut ByteCursor<'_>, field: &'static str) -> Result<String, TagError> {
    let len = cursor.read_u8().map_err(|source| TagError { field, source })?;
    let bytes = cursor
        .read_fixed_bytes(usize::from(len))
        .map_err(|source| TagError { field, source })?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// `<short address>::<module>::<struct>`, e.g. `0x1::object::ObjectCore`.
impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.address.to_short_string(),
            self.module,
            self.name
        )
    }
}
