// Write-operation envelope around values in a delta snapshot.
//
// A snapshot value for a state key is the BCS encoding of the write that
// produced it:
//
//   discriminator  1 byte   (0 = Creation, 1 = Modification)
//   length         ULEB128
//   data           `length` bytes
//
// Only the two data-carrying variants without metadata are recognised, and
// only when the declared length covers the rest of the buffer exactly or
// runs past its end (a truncated value). Anything else is left to the caller
// to interpret as bare bytes.
//
// A bare resource group can match this shape by accident (count 1, then an
// address that reads as a large ULEB128), so recognising the shape is not
// proof of an envelope. `group::decode_value` decides.

use std::fmt;

use crate::bcs::ByteCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOpKind {
    Creation,
    Modification,
}

impl WriteOpKind {
    pub fn from_discriminator(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Creation),
            1 => Some(Self::Modification),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Modification => "modification",
        }
    }
}

impl fmt::Display for WriteOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The data carried by a recognised write operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOpValue<'a> {
    pub kind: WriteOpKind,
    /// Data bytes present in the buffer.
    pub data: &'a [u8],
    /// Data length the envelope declares.
    pub declared_len: u64,
    /// Bytes before `data`: discriminator plus length.
    pub header_len: usize,
}

impl<'a> WriteOpValue<'a> {
    /// Recognises the envelope, or returns `None` for anything that does not
    /// match its shape exactly.
    pub fn parse(bytes: &'a [u8]) -> Option<Self> {
        let mut c = ByteCursor::new(bytes);
        let kind = WriteOpKind::from_discriminator(c.read_u8().ok()?)?;
        let declared_len = c.read_uleb128().ok()?;
        if declared_len < c.remaining() as u64 {
            return None;
        }
        Some(Self {
            kind,
            data: c.rest(),
            declared_len,
            header_len: c.position(),
        })
    }

    /// The buffer ends before the declared data length.
    pub fn is_truncated(&self) -> bool {
        self.declared_len > self.data.len() as u64
    }

    /// The declared length covers the rest of the buffer exactly.
    pub fn is_exact(&self) -> bool {
        self.declared_len == self.data.len() as u64
    }
}
