// Move resource decoding on top of the BCS primitives.
//
// # Modules
//
// - `address` : 32-byte account addresses
// - `tag`     : struct tags (address + module + struct)
// - `known`   : dispatcher and fixed-layout decoders (ObjectCore, FungibleStore)
// - `group`   : resource-group enumeration with partial results
// - `write_op`: write-operation envelope around snapshot values
// - `balance` : CoinStore balance fast path

pub mod address;
pub mod balance;
pub mod group;
pub mod known;
pub mod tag;
pub mod write_op;

pub use address::{AccountAddress, AddressError};
pub use balance::{coin_store_balance, coin_store_balance_hex};
pub use group::{
    GroupDecode, GroupError, ResourceGroup, ResourceGroupEntry, ValueFraming, decode_group_value,
    decode_resource_group, decode_value,
};
pub use known::{DecodedStruct, FungibleStore, KnownStruct, ObjectCore, TruncatedStruct, dispatch};
pub use tag::{StructTag, TagError};
pub use write_op::{WriteOpKind, WriteOpValue};
