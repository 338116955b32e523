// BCS variable-length integer decoding (ULEB128).
//
// Base-128, little-endian: least-significant group first.
// Each byte has bit 7 set except the final byte.
// Used for entry counts and byte lengths in resource groups.

use thiserror::Error;

/// Maximum encoded length for a 64-bit value (ceil(64/7) = 10).
pub const MAX_VARINT_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Decoding from byte slices
// ---------------------------------------------------------------------------

/// Decode a `u64` from the start of `data`.
/// Returns `(value, bytes_consumed)` or an error.
///
/// Termination is bounded by `data.len()`: a slice that ends before a byte
/// with a clear high bit yields [`VarIntError::Truncated`]. Bits that would
/// shift past 64 yield [`VarIntError::Overflow`] instead of wrapping.
pub fn read_u64(data: &[u8]) -> Result<(u64, usize), VarIntError> {
    let mut val: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        let group = u64::from(byte & 0x7F);
        if i >= MAX_VARINT_LEN {
            return Err(VarIntError::Overflow);
        }
        let shift = 7 * i as u32;
        if shift > 0 && group >> (64 - shift) != 0 {
            return Err(VarIntError::Overflow);
        }
        val |= group << shift;
        if byte & 0x80 == 0 {
            return Ok((val, i + 1));
        }
    }
    Err(VarIntError::Truncated)
}

/// Length of the ULEB128 run at the start of `data` without decoding it:
/// bytes are skipped while the high bit is set, then one final byte.
///
/// Returns `None` when `data` ends inside the run.
pub fn skip_len(data: &[u8]) -> Option<usize> {
    data.iter().position(|b| b & 0x80 == 0).map(|i| i + 1)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarIntError {
    /// Input ended before a terminating byte.
    #[error("varint truncated (no terminating byte)")]
    Truncated,
    /// Value does not fit in the target integer type.
    #[error("varint overflow")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_byte_length() {
        // (0xf6 & 0x7f) | (0x01 << 7) = 118 + 128
        assert_eq!(read_u64(&[0xf6, 0x01]), Ok((246, 2)));
    }

    #[test]
    fn encoding_is_little_endian() {
        // 300 = 0b10_0101100 -> low group first: 0xAC 0x02
        assert_eq!(read_u64(&[0xAC, 0x02]), Ok((300, 2)));
    }

    #[test]
    fn single_byte_values() {
        for val in 0..=127u8 {
            assert_eq!(read_u64(&[val]), Ok((u64::from(val), 1)));
        }
    }

    #[test]
    fn stops_at_terminator() {
        assert_eq!(read_u64(&[0x02, 0xFF, 0xFF]), Ok((2, 1)));
    }

    #[test]
    fn max_u64() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert_eq!(read_u64(&data), Ok((u64::MAX, 10)));
    }

    #[test]
    fn overflow_detection() {
        // Tenth byte carries more than the single remaining bit.
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02];
        assert_eq!(read_u64(&data), Err(VarIntError::Overflow));

        // Eleven bytes can never fit.
        let data = [0x80; 11];
        assert_eq!(read_u64(&data), Err(VarIntError::Overflow));
    }

    #[test]
    fn truncation_detection() {
        assert_eq!(read_u64(&[]), Err(VarIntError::Truncated));
        assert_eq!(read_u64(&[0x80, 0x80, 0x80]), Err(VarIntError::Truncated));
    }

    #[test]
    fn skip_len_matches_decoder() {
        assert_eq!(skip_len(&[0xf6, 0x01, 0x69]), Some(2));
        assert_eq!(skip_len(&[0x05]), Some(1));
        assert_eq!(skip_len(&[0x80, 0x80]), None);
        assert_eq!(skip_len(&[]), None);
    }
}
