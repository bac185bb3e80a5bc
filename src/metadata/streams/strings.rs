//! String Heap (`#Strings`) access.
//!
//! Identifier strings referenced from metadata tables, stored null-terminated
//! in UTF-8. An index is a byte offset into the heap, not an element count;
//! offset 0 always holds the empty string.

use std::ffi::CStr;

use crate::{Error::OutOfBounds, Result};

/// Read-only view over the `#Strings` heap.
///
/// # Examples
///
/// ```rust
/// use dotmeta::metadata::streams::Strings;
/// let data = &[0u8, b'H', b'e', b'l', b'l', b'o', 0u8];
/// let strings = Strings::from(data).unwrap();
/// assert_eq!(strings.get(1).unwrap(), "Hello");
/// assert_eq!(strings.get(0).unwrap(), "");
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a `Strings` view from raw heap bytes.
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the
    /// mandatory leading null byte.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #Strings heap is empty"));
        }

        Ok(Strings { data })
    }

    /// Resolve the string starting at the given heap offset.
    ///
    /// Offset 0 denotes the absent/empty string. The read is repeatable and
    /// side-effect-free.
    ///
    /// # Errors
    /// Returns an error if the offset is out of bounds, the string is not
    /// null-terminated, or the bytes are not valid UTF-8.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(raw) => match raw.to_str() {
                Ok(text) => Ok(text),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }
}
