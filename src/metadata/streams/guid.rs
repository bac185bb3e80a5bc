//! GUID Heap (`#GUID`) access.
//!
//! A tightly packed array of 16-byte GUIDs. Unlike the other heaps this one
//! is indexed by 1-based element position, not byte offset; index 0 denotes
//! the absent GUID.

use crate::{Error::OutOfBounds, Result};

/// Read-only view over the `#GUID` heap.
///
/// # Examples
///
/// ```rust
/// use dotmeta::metadata::streams::Guid;
/// let data = [0x01u8; 16];
/// let guids = Guid::from(&data).unwrap();
/// let guid = guids.get(1).unwrap();
/// ```
pub struct Guid<'a> {
    data: &'a [u8],
}

impl<'a> Guid<'a> {
    /// Create a `Guid` view from raw heap bytes.
    ///
    /// # Errors
    /// Returns an error if the heap is empty.
    pub fn from(data: &'a [u8]) -> Result<Guid<'a>> {
        if data.is_empty() {
            return Err(malformed_error!("Provided #GUID heap is empty"));
        }

        Ok(Guid { data })
    }

    /// Resolve the GUID at the given 1-based index.
    ///
    /// # Errors
    /// Returns an error for index 0 or an index past the end of the heap.
    pub fn get(&self, index: usize) -> Result<uguid::Guid> {
        if index == 0 {
            return Err(OutOfBounds);
        }

        let offset = (index - 1) * 16;
        match self.data.get(offset..offset + 16) {
            Some(bytes) => {
                let mut raw = [0u8; 16];
                raw.copy_from_slice(bytes);
                Ok(uguid::Guid::from_bytes(raw))
            }
            None => Err(OutOfBounds),
        }
    }
}
