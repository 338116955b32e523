// BCS (Binary Canonical Serialization) read primitives.
//
// # Modules
//
// - `varint`: ULEB128 variable-length integers (counts and lengths)
// - `cursor`: bounds-checked read head over an immutable byte buffer

pub mod cursor;
pub mod varint;

pub use cursor::{ByteCursor, ReadError};
pub use varint::VarIntError;
