// Coin balance fast path.
//
// Reads only the balance of a `0x1::coin::CoinStore<T>` delta value without
// parsing the struct:
//
//   leading count   ULEB128, skipped (bytes with the high bit set, then one)
//   discriminator   1 byte, skipped
//   balance         u64 little-endian
//
// This assumes a single resource behind a single write op. It is a heuristic
// over the observed layout and must not be pointed at packed resource groups.

use crate::bcs::ByteCursor;
use crate::bcs::varint;

/// Extracts the balance, or `None` when fewer than 8 bytes follow the
/// skipped prefix. Never fails otherwise.
pub fn coin_store_balance(bytes: &[u8]) -> Option<u64> {
    let prefix = varint::skip_len(bytes)? + 1;
    let mut c = ByteCursor::new(bytes);
    c.skip(prefix).ok()?;
    c.read_u64_le().ok()
}

/// [`coin_store_balance`] over a hex string (`0x` prefix optional).
/// Malformed hex is reported as `None` as well.
pub fn coin_store_balance_hex(hex: &str) -> Option<u64> {
    let bytes = crate::io::parse_hex(hex).ok()?;
    coin_store_balance(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_after_prefix() {
        let mut bytes = vec![0xf6, 0x01, 0x69];
        bytes.extend_from_slice(&100_000_000u64.to_le_bytes());
        bytes.extend_from_slice(&[0xaa; 16]);
        assert_eq!(coin_store_balance(&bytes), Some(100_000_000));
    }

    #[test]
    fn single_byte_count() {
        let mut bytes = vec![0x00, 0x69];
        bytes.extend_from_slice(&42u64.to_le_bytes());
        assert_eq!(coin_store_balance(&bytes), Some(42));
    }

    #[test]
    fn short_input_is_unavailable() {
        assert_eq!(coin_store_balance(&[]), None);
        assert_eq!(coin_store_balance(&[0x80, 0x80, 0x80]), None);
        assert_eq!(coin_store_balance(&[0x00]), None);
        assert_eq!(coin_store_balance(&[0x00, 0x69, 1, 2, 3, 4, 5, 6, 7]), None);
    }

    #[test]
    fn hex_input() {
        assert_eq!(
            coin_store_balance_hex("0x00690100000000000000"),
            Some(1)
        );
        assert_eq!(coin_store_balance_hex("00690000000000000000"), Some(0));
        assert_eq!(coin_store_balance_hex("0xnothex"), None);
        assert_eq!(coin_store_balance_hex(""), None);
    }
}
