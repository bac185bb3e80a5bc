//! Shared encoding helpers for the compressed formats of ECMA-335 II.23.2.
//!
//! These are the write-side counterparts of the [`crate::Parser`] read
//! methods. Size computation and actual encoding are kept side by side so the
//! self-consistency invariant (declared length == bytes written) is easy to
//! uphold and to test.

use crate::{Error, Result};

/// Number of bytes `write_compressed_uint` will emit for `value`.
#[must_use]
pub fn compressed_uint_size(value: u32) -> u32 {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        _ => 4,
    }
}

/// Append an ECMA-335 compressed unsigned integer to `buffer`.
///
/// # Errors
/// Returns [`crate::Error::ModificationInvalid`] if `value` exceeds the
/// 29-bit range the encoding can represent.
pub fn write_compressed_uint(value: u32, buffer: &mut Vec<u8>) -> Result<()> {
    match value {
        0..=0x7F => buffer.push(value as u8),
        0x80..=0x3FFF => {
            buffer.push(0x80 | (value >> 8) as u8);
            buffer.push(value as u8);
        }
        0x4000..=0x1FFF_FFFF => {
            buffer.push(0xC0 | (value >> 24) as u8);
            buffer.push((value >> 16) as u8);
            buffer.push((value >> 8) as u8);
            buffer.push(value as u8);
        }
        _ => {
            return Err(Error::ModificationInvalid(format!(
                "Value 0x{value:08x} exceeds the compressed integer range"
            )))
        }
    }

    Ok(())
}

/// Number of bytes `write_ser_string` will emit for `value`.
///
/// `None` (the null string) always encodes as the single `0xFF` sentinel.
#[must_use]
pub fn ser_string_size(value: Option<&str>) -> u32 {
    match value {
        None => 1,
        Some(text) => {
            let length = text.len() as u32;
            compressed_uint_size(length) + length
        }
    }
}

/// Append a serialized string (compressed length + UTF-8 bytes) to `buffer`.
///
/// # Errors
/// Returns [`crate::Error::ModificationInvalid`] if the string is too long
/// for the compressed length prefix.
pub fn write_ser_string(value: Option<&str>, buffer: &mut Vec<u8>) -> Result<()> {
    match value {
        None => buffer.push(0xFF),
        Some(text) => {
            write_compressed_uint(text.len() as u32, buffer)?;
            buffer.extend_from_slice(text.as_bytes());
        }
    }

    Ok(())
}
