//! Blob Heap (`#Blob`) access.
//!
//! Variable-length binary data (signatures, constant values, public keys),
//! each entry prefixed with its length as a compressed unsigned integer.
//! Offset 0 holds the mandatory single null byte and denotes the null blob.

use crate::{Error::OutOfBounds, Parser, Result};

/// Read-only view over the `#Blob` heap.
///
/// # Examples
///
/// ```rust
/// use dotmeta::metadata::streams::Blob;
/// let data = &[0u8, 0x02, 0x06, 0x08];
/// let blob = Blob::from(data).unwrap();
/// assert_eq!(blob.get(1).unwrap(), &[0x06, 0x08]);
/// ```
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Create a `Blob` view from raw heap bytes.
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the
    /// mandatory null byte.
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #Blob heap is empty"));
        }

        Ok(Blob { data })
    }

    /// Resolve the blob starting at the given heap offset.
    ///
    /// The compressed length prefix is consumed; the returned slice is the
    /// payload only. Offset 0 yields the empty slice (null blob).
    ///
    /// # Errors
    /// Returns an error if the offset is out of bounds or the declared length
    /// overruns the heap.
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[index..]);
        let length = parser.read_compressed_uint()? as usize;
        parser.read_bytes(length)
    }
}
