// Input helpers: hex text to bytes, and reading hex from files or stdin.
//
// Hex values in delta snapshots are optionally `0x`-prefixed. Text read from
// files or pipes may carry line breaks and surrounding whitespace, which is
// dropped before decoding.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{path}: {source}")]
    File {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

// ---------------------------------------------------------------------------
// Hex parsing
// ---------------------------------------------------------------------------

/// Decodes hex text, ignoring whitespace and an optional `0x`/`0X` prefix.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.contains(char::is_whitespace) {
        let compact: String = digits.chars().filter(|c| !c.is_whitespace()).collect();
        hex::decode(compact)
    } else {
        hex::decode(digits)
    }
}

/// Lowercase hex with a `0x` prefix.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Reads hex text from `inline`, else from `path`, else from stdin, and
/// decodes it.
pub fn read_hex_input(inline: Option<&str>, path: Option<&Path>) -> Result<Vec<u8>, InputError> {
    let text = match (inline, path) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => fs::read_to_string(path).map_err(|source| InputError::File {
            path: path.display().to_string(),
            source,
        })?,
        (None, None) => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(parse_hex(&text)?)
}
