//! Heap rebuild buffers.
//!
//! Each buffer accumulates one heap for a rebuild pass: entries are interned
//! on first insertion and every later insertion of an equal value returns the
//! same offset. Offsets handed out are final; nothing is ever removed or
//! relocated, so a flushed row can embed them directly.

use std::collections::HashMap;

use crate::{utils::write_compressed_uint, Result};

/// Builder for a new `#Strings` heap.
///
/// # Examples
///
/// ```rust
/// use dotmeta::metadata::streams::StringsBuffer;
/// let mut buffer = StringsBuffer::new();
/// let a = buffer.get_or_add("MyField");
/// let b = buffer.get_or_add("MyField");
/// assert_eq!(a, b);
/// assert_eq!(buffer.get_or_add(""), 0);
/// ```
pub struct StringsBuffer {
    data: Vec<u8>,
    offsets: HashMap<String, u32>,
}

impl StringsBuffer {
    /// Create an empty buffer holding only the reserved null entry.
    #[must_use]
    pub fn new() -> Self {
        StringsBuffer {
            data: vec![0],
            offsets: HashMap::new(),
        }
    }

    /// Intern `value` and return its heap offset.
    ///
    /// The empty string always maps to offset 0.
    pub fn get_or_add(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }

        if let Some(offset) = self.offsets.get(value) {
            return *offset;
        }

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        self.offsets.insert(value.to_string(), offset);
        offset
    }

    /// The accumulated heap image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Default for StringsBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a new `#Blob` heap.
pub struct BlobBuffer {
    data: Vec<u8>,
    offsets: HashMap<Vec<u8>, u32>,
}

impl BlobBuffer {
    /// Create an empty buffer holding only the reserved null entry.
    #[must_use]
    pub fn new() -> Self {
        BlobBuffer {
            data: vec![0],
            offsets: HashMap::new(),
        }
    }

    /// Intern `value` and return its heap offset.
    ///
    /// The empty blob always maps to offset 0.
    ///
    /// # Errors
    /// Returns an error if the blob is too long for the compressed length
    /// prefix.
    pub fn get_or_add(&mut self, value: &[u8]) -> Result<u32> {
        if value.is_empty() {
            return Ok(0);
        }

        if let Some(offset) = self.offsets.get(value) {
            return Ok(*offset);
        }

        let offset = self.data.len() as u32;
        write_compressed_uint(value.len() as u32, &mut self.data)?;
        self.data.extend_from_slice(value);
        self.offsets.insert(value.to_vec(), offset);
        Ok(offset)
    }

    /// The accumulated heap image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Default for BlobBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a new `#GUID` heap.
pub struct GuidBuffer {
    data: Vec<u8>,
    indices: HashMap<uguid::Guid, u32>,
}

impl GuidBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        GuidBuffer {
            data: Vec::new(),
            indices: HashMap::new(),
        }
    }

    /// Intern `value` and return its 1-based heap index.
    pub fn get_or_add(&mut self, value: uguid::Guid) -> u32 {
        if let Some(index) = self.indices.get(&value) {
            return *index;
        }

        let index = (self.data.len() / 16) as u32 + 1;
        self.data.extend_from_slice(&value.to_bytes());
        self.indices.insert(value, index);
        index
    }

    /// The accumulated heap image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Default for GuidBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// True if a UTF-16 code unit forces the `#US` trailing flag byte to 1
/// (ECMA-335 II.24.2.4).
fn needs_special_handling(unit: u16) -> bool {
    matches!(unit, 0x01..=0x08 | 0x0E..=0x1F | 0x27 | 0x2D | 0x7F) || unit >= 0x80
}

/// Builder for a new `#US` heap.
pub struct UserStringsBuffer {
    data: Vec<u8>,
    offsets: HashMap<String, u32>,
}

impl UserStringsBuffer {
    /// Create an empty buffer holding only the reserved null entry.
    #[must_use]
    pub fn new() -> Self {
        UserStringsBuffer {
            data: vec![0],
            offsets: HashMap::new(),
        }
    }

    /// Intern `value` and return its heap offset.
    ///
    /// The entry is encoded as UTF-16LE with the trailing flag byte computed
    /// from the code units.
    ///
    /// # Errors
    /// Returns an error if the encoded entry is too long for the compressed
    /// length prefix.
    pub fn get_or_add(&mut self, value: &str) -> Result<u32> {
        if let Some(offset) = self.offsets.get(value) {
            return Ok(*offset);
        }

        let units: Vec<u16> = value.encode_utf16().collect();
        let flag = u8::from(units.iter().any(|unit| needs_special_handling(*unit)));

        let offset = self.data.len() as u32;
        write_compressed_uint(units.len() as u32 * 2 + 1, &mut self.data)?;
        for unit in &units {
            self.data.extend_from_slice(&unit.to_le_bytes());
        }
        self.data.push(flag);
        self.offsets.insert(value.to_string(), offset);
        Ok(offset)
    }

    /// The accumulated heap image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Default for UserStringsBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::streams::{Blob, Strings, UserStrings};
    use uguid::guid;

    #[test]
    fn strings_interning() {
        let mut buffer = StringsBuffer::new();

        let first = buffer.get_or_add("MyField");
        let second = buffer.get_or_add("Namespace");
        assert_ne!(first, second);
        assert_eq!(buffer.get_or_add("MyField"), first);
        assert_eq!(buffer.get_or_add(""), 0);

        let heap = Strings::from(buffer.data()).unwrap();
        assert_eq!(heap.get(first as usize).unwrap(), "MyField");
        assert_eq!(heap.get(second as usize).unwrap(), "Namespace");
    }

    #[test]
    fn blob_interning() {
        let mut buffer = BlobBuffer::new();

        let first = buffer.get_or_add(&[0x06, 0x08]).unwrap();
        assert_eq!(buffer.get_or_add(&[0x06, 0x08]).unwrap(), first);
        assert_eq!(buffer.get_or_add(&[]).unwrap(), 0);

        let heap = Blob::from(buffer.data()).unwrap();
        assert_eq!(heap.get(first as usize).unwrap(), &[0x06, 0x08]);
    }

    #[test]
    fn guid_indexing() {
        let mut buffer = GuidBuffer::new();

        let a = guid!("04030201-0605-0807-090a-0b0c0d0e0f10");
        let b = guid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

        assert_eq!(buffer.get_or_add(a), 1);
        assert_eq!(buffer.get_or_add(b), 2);
        assert_eq!(buffer.get_or_add(a), 1);
        assert_eq!(buffer.data().len(), 32);
    }

    #[test]
    fn userstrings_flag_byte() {
        let mut buffer = UserStringsBuffer::new();

        let plain = buffer.get_or_add("Hello").unwrap();
        let special = buffer.get_or_add("It's").unwrap();
        let wide = buffer.get_or_add("\u{2764}").unwrap();

        let heap = UserStrings::from(buffer.data()).unwrap();
        assert_eq!(heap.get(plain as usize).unwrap(), ("Hello".to_string(), 0));
        assert_eq!(heap.get(special as usize).unwrap(), ("It's".to_string(), 1));
        assert_eq!(
            heap.get(wide as usize).unwrap(),
            ("\u{2764}".to_string(), 1)
        );

        assert_eq!(buffer.get_or_add("Hello").unwrap(), plain);
    }
}
