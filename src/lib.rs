//! Movedelta: decoding BCS resource groups from Move state snapshots.
//!
//! The crate provides:
//! - BCS read primitives: ULEB128 and a bounds-checked cursor (`bcs`)
//! - Resource decoding: struct tags, resource groups, known framework
//!   structs, and the CoinStore balance fast path (`resource`)
//! - Owned, printable reports of decoded groups (`report`)
//! - Hex input helpers and a diagnostic hex dump (`io`, `hexdump`)
//! - A `delta.json` snapshot adapter (`json` feature)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use movedelta::resource::{decode_group_value, DecodedStruct};
//!
//! // Creation write op wrapping a group with one unknown resource.
//! let mut group = vec![0x01];
//! group.extend_from_slice(&[0u8; 31]);
//! group.push(0x01);
//! group.extend_from_slice(&[4, b'c', b'o', b'i', b'n']);
//! group.extend_from_slice(&[1, b'S']);
//! group.extend_from_slice(&[2, 0xaa, 0xbb]);
//! let mut value = vec![0x00, group.len() as u8];
//! value.extend_from_slice(&group);
//!
//! let decoded = decode_group_value(&value);
//! assert!(decoded.is_complete());
//! let entry = &decoded.group.entries[0];
//! assert_eq!(entry.tag.to_string(), "0x1::coin::S");
//! assert_eq!(entry.decode(), Ok(DecodedStruct::Opaque(&[0xaa, 0xbb][..])));
//! ```

pub mod bcs;
pub mod hexdump;
pub mod io;
pub mod report;
pub mod resource;

#[cfg(feature = "json")]
pub mod snapshot;

#[cfg(feature = "cli")]
pub mod cli;
