//! Fixed-width scalar decoding
//!
//! All numeric fields in summary files are big-endian. Text fields are
//! single-byte windows-1256 and padded with trailing blanks.

use crate::types::{ReaderError, Result};
use byteorder::{BigEndian, ByteOrder};
use encoding_rs::WINDOWS_1256;

fn check_width(bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        return Err(ReaderError::InvalidWidth {
            expected,
            found: bytes.len(),
        });
    }
    Ok(())
}

/// Decode a big-endian signed 32-bit integer
pub fn decode_int(bytes: &[u8]) -> Result<i32> {
    check_width(bytes, 4)?;
    Ok(BigEndian::read_i32(bytes))
}

/// Decode a big-endian IEEE-754 single
pub fn decode_real(bytes: &[u8]) -> Result<f32> {
    check_width(bytes, 4)?;
    Ok(BigEndian::read_f32(bytes))
}

/// Decode a big-endian IEEE-754 double
pub fn decode_double(bytes: &[u8]) -> Result<f64> {
    check_width(bytes, 8)?;
    Ok(BigEndian::read_f64(bytes))
}

/// Decode a padded text field of any width
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1256.decode_without_bom_handling(bytes);
    text.trim_end_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}
