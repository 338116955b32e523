// Read head over an immutable BCS byte buffer.
//
// Every read is bounds-checked against the remaining span and advances the
// offset only on success. A failed read leaves the cursor where it was.

use thiserror::Error;

use super::varint::{self, VarIntError};

/// Error from a primitive read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Fewer bytes remain than a fixed-width or length-prefixed read needs.
    #[error("truncated input at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// ULEB128 never terminated within the remaining bytes.
    #[error("truncated varint at offset {offset}")]
    TruncatedVarint { offset: usize },

    /// ULEB128 value does not fit in 64 bits.
    #[error("varint overflow at offset {offset}")]
    VarintOverflow { offset: usize },
}

impl ReadError {
    fn from_varint(e: VarIntError, offset: usize) -> Self {
        match e {
            VarIntError::Truncated => Self::TruncatedVarint { offset },
            VarIntError::Overflow => Self::VarintOverflow { offset },
        }
    }

    /// Offset where the failing read started.
    pub fn offset(&self) -> usize {
        match *self {
            Self::Truncated { offset, .. }
            | Self::TruncatedVarint { offset }
            | Self::VarintOverflow { offset } => offset,
        }
    }

    /// The same error for a buffer embedded `by` bytes into a larger one.
    pub fn shifted(self, by: usize) -> Self {
        match self {
            Self::Truncated {
                offset,
                needed,
                available,
            } => Self::Truncated {
                offset: offset + by,
                needed,
                available,
            },
            Self::TruncatedVarint { offset } => Self::TruncatedVarint {
                offset: offset + by,
            },
            Self::VarintOverflow { offset } => Self::VarintOverflow {
                offset: offset + by,
            },
        }
    }
}

/// Cursor over a borrowed byte buffer.
///
/// Invariant: `0 <= pos <= data.len()`. Slices returned by reads borrow from
/// the underlying buffer, not from the cursor.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read offset.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The unread tail of the buffer.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<(), ReadError> {
        let available = self.remaining();
        if needed > available {
            return Err(ReadError::Truncated {
                offset: self.pos,
                needed,
                available,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.ensure(1)?;
        let byte = self.data[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Reads 8 bytes as a little-endian `u64`.
    #[inline]
    pub fn read_u64_le(&mut self) -> Result<u64, ReadError> {
        let bytes = self.read_array::<8>()?;
        Ok(u64::from_le_bytes(bytes))
    }

    /// Any non-zero byte is `true`.
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads exactly `n` bytes.
    #[inline]
    pub fn read_fixed_bytes(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads exactly `N` bytes into an array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    /// Reads a ULEB128 integer.
    pub fn read_uleb128(&mut self) -> Result<u64, ReadError> {
        let (val, consumed) =
            varint::read_u64(self.rest()).map_err(|e| ReadError::from_varint(e, self.pos))?;
        self.pos += consumed;
        Ok(val)
    }

    /// Advances past `n` bytes without returning them.
    pub fn skip(&mut self, n: usize) -> Result<(), ReadError> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_little_endian() {
        let mut c = ByteCursor::new(&[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(c.read_u64_le(), Ok(1));
        assert_eq!(c.remaining(), 0);

        let mut c = ByteCursor::new(&[0; 8]);
        assert_eq!(c.read_u64_le(), Ok(0));

        let mut c = ByteCursor::new(&[0x00, 0x01, 0, 0, 0, 0, 0, 0]);
        assert_eq!(c.read_u64_le(), Ok(256));
    }

    #[test]
    fn bool_is_nonzero() {
        let mut c = ByteCursor::new(&[0, 1, 0x7f]);
        assert_eq!(c.read_bool(), Ok(false));
        assert_eq!(c.read_bool(), Ok(true));
        assert_eq!(c.read_bool(), Ok(true));
        assert!(c.is_empty());
    }

    #[test]
    fn fixed_bytes_borrow_from_buffer() {
        let data = [9u8; 40];
        let mut c = ByteCursor::new(&data);
        let addr = c.read_fixed_bytes(32).unwrap();
        assert_eq!(addr.len(), 32);
        assert_eq!(c.position(), 32);
        assert_eq!(c.remaining(), 8);
    }

    #[test]
    fn short_read_does_not_advance() {
        let mut c = ByteCursor::new(&[1, 2, 3]);
        c.read_u8().unwrap();
        let err = c.read_u64_le().unwrap_err();
        assert_eq!(
            err,
            ReadError::Truncated {
                offset: 1,
                needed: 8,
                available: 2
            }
        );
        assert_eq!(c.position(), 1);
        assert_eq!(c.read_fixed_bytes(2).unwrap(), &[2, 3]);
        assert!(c.read_u8().is_err());
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn uleb128_advances_by_consumed() {
        let mut c = ByteCursor::new(&[0xf6, 0x01, 0x02]);
        assert_eq!(c.read_uleb128(), Ok(246));
        assert_eq!(c.position(), 2);
        assert_eq!(c.read_uleb128(), Ok(2));
    }

    #[test]
    fn uleb128_errors_carry_offset() {
        let mut c = ByteCursor::new(&[0x01, 0x80, 0x80]);
        c.read_u8().unwrap();
        assert_eq!(
            c.read_uleb128(),
            Err(ReadError::TruncatedVarint { offset: 1 })
        );
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn skip_is_bounded() {
        let mut c = ByteCursor::new(&[0; 4]);
        assert!(c.skip(5).is_err());
        c.skip(4).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn shifted_errors_keep_their_kind() {
        let e = ReadError::Truncated {
            offset: 4,
            needed: 8,
            available: 2,
        };
        assert_eq!(
            e.shifted(3),
            ReadError::Truncated {
                offset: 7,
                needed: 8,
                available: 2,
            }
        );
        assert_eq!(ReadError::TruncatedVarint { offset: 0 }.shifted(2).offset(), 2);
        assert_eq!(ReadError::VarintOverflow { offset: 1 }.offset(), 1);
    }
}
