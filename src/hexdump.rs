// Canonical hex+ASCII dump for inspecting raw payloads.
//
//   00000000  00 f6 01 02 00 00 00 00  00 00 00 00 00 00 00 00  |................|

use std::fmt;

pub const BYTES_PER_LINE: usize = 16;

/// Display adapter; one line per 16 bytes, each terminated by `\n`.
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a> {
    bytes: &'a [u8],
    base_offset: usize,
}

impl<'a> HexDump<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            base_offset: 0,
        }
    }

    /// Offsets in the gutter start at `base` instead of zero.
    pub fn with_base_offset(mut self, base: usize) -> Self {
        self.base_offset = base;
        self
    }
}

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, chunk) in self.bytes.chunks(BYTES_PER_LINE).enumerate() {
            write!(f, "{:08x}  ", self.base_offset + line * BYTES_PER_LINE)?;
            for i in 0..BYTES_PER_LINE {
                match chunk.get(i) {
                    Some(b) => write!(f, "{b:02x} ")?,
                    None => f.write_str("   ")?,
                }
                if i == BYTES_PER_LINE / 2 - 1 {
                    f.write_str(" ")?;
                }
            }
            f.write_str(" |")?;
            for &b in chunk {
                let c = if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            f.write_str("|\n")?;
        }
        Ok(())
    }
}

pub fn format_hex_dump(bytes: &[u8]) -> String {
    HexDump::new(bytes).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_line() {
        let bytes: Vec<u8> = (0x41..0x51).collect();
        assert_eq!(
            format_hex_dump(&bytes),
            "00000000  41 42 43 44 45 46 47 48  49 4a 4b 4c 4d 4e 4f 50  |ABCDEFGHIJKLMNOP|\n"
        );
    }

    #[test]
    fn partial_line_is_padded() {
        let out = format_hex_dump(&[0x00, b'h', b'i']);
        assert_eq!(
            out,
            "00000000  00 68 69                                          |.hi|\n"
        );
    }

    #[test]
    fn offsets_advance_by_line() {
        let out = format_hex_dump(&[0u8; 33]);
        let offsets: Vec<_> = out.lines().map(|l| &l[..8]).collect();
        assert_eq!(offsets, ["00000000", "00000010", "00000020"]);
    }

    #[test]
    fn base_offset() {
        let out = HexDump::new(&[1]).with_base_offset(0x40).to_string();
        assert!(out.starts_with("00000040  01 "));
    }

    #[test]
    fn empty_input() {
        assert_eq!(format_hex_dump(&[]), "");
    }
}
