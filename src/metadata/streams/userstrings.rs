//! User String Heap (`#US`) access.
//!
//! String literals referenced by IL `ldstr`, stored as a compressed length
//! prefix followed by UTF-16LE code units and one trailing flag byte. The
//! declared length covers the character bytes plus the flag byte, so it is
//! always odd for a well-formed entry. The flag byte is 0x01 when any
//! character needs special handling beyond simple ASCII, 0x00 otherwise.

use widestring::U16Str;

use crate::{Error::OutOfBounds, Parser, Result};

/// Read-only view over the `#US` heap.
///
/// # Examples
///
/// ```rust
/// use dotmeta::metadata::streams::UserStrings;
/// let data = &[0u8, 0x05, b'H', 0, b'i', 0, 0x00];
/// let us = UserStrings::from(data).unwrap();
/// let (text, flag) = us.get(1).unwrap();
/// assert_eq!(text, "Hi");
/// assert_eq!(flag, 0x00);
/// ```
pub struct UserStrings<'a> {
    data: &'a [u8],
}

impl<'a> UserStrings<'a> {
    /// Create a `UserStrings` view from raw heap bytes.
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the
    /// mandatory null byte.
    pub fn from(data: &'a [u8]) -> Result<UserStrings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #US heap is empty"));
        }

        Ok(UserStrings { data })
    }

    /// Resolve the user string at the given heap offset, returning the
    /// decoded text and its trailing flag byte.
    ///
    /// Offset 0 (the null entry) yields the empty string with flag 0.
    ///
    /// # Errors
    /// Returns an error if the offset is out of bounds, the declared length
    /// is even (no room for the flag byte), the entry overruns the heap, or
    /// the UTF-16 data contains unpaired surrogates.
    pub fn get(&self, index: usize) -> Result<(String, u8)> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[index..]);
        let length = parser.read_compressed_uint()? as usize;
        if length == 0 {
            return Ok((String::new(), 0));
        }

        if length % 2 == 0 {
            return Err(malformed_error!(
                "User string at offset {} has even length {}",
                index,
                length
            ));
        }

        let bytes = parser.read_bytes(length)?;
        let (chars, flag) = bytes.split_at(length - 1);

        let units: Vec<u16> = chars
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        match U16Str::from_slice(&units).to_string() {
            Ok(text) => Ok((text, flag[0])),
            Err(_) => Err(malformed_error!(
                "Invalid UTF-16 in user string at offset {}",
                index
            )),
        }
    }
}
