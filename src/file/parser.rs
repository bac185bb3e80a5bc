//! Positional byte cursor for heap and signature decoding.
//!
//! [`Parser`] is the single I/O primitive the metadata layer consumes: a
//! bounds-checked cursor over a byte slice with the ECMA-335 compressed
//! encodings (II.23.2) layered on top. It never reads past the end of its
//! slice and never produces a partial value.

use crate::{
    file::io::{read_le_at, LeBytes},
    metadata::token::Token,
    Error::OutOfBounds,
    Result,
};

/// A positional reader over a byte slice.
///
/// # Examples
///
/// ```rust,ignore
/// let mut parser = Parser::new(&[0x81, 0x01]);
/// assert_eq!(parser.read_compressed_uint()?, 0x101);
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new `Parser` over the provided byte slice.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Current cursor position in bytes from the start of the slice.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// True while at least one more byte can be read.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Number of bytes left between the cursor and the end of the slice.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the cursor to an absolute position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` lies past the end.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Advance the cursor by one byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the slice.
    pub fn advance(&mut self) -> Result<()> {
        self.advance_by(1)
    }

    /// Advance the cursor by `count` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `count` bytes remain.
    pub fn advance_by(&mut self, count: usize) -> Result<()> {
        match self.position.checked_add(count) {
            Some(end) if end <= self.data.len() => {
                self.position = end;
                Ok(())
            }
            _ => Err(OutOfBounds),
        }
    }

    /// Return the byte at the cursor without consuming it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the slice.
    pub fn peek_byte(&self) -> Result<u8> {
        match self.data.get(self.position) {
            Some(byte) => Ok(*byte),
            None => Err(OutOfBounds),
        }
    }

    /// Read a little-endian scalar and advance the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the slice is exhausted.
    pub fn read_le<T: LeBytes>(&mut self) -> Result<T> {
        read_le_at(self.data, &mut self.position)
    }

    /// Read `length` raw bytes and advance the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        match self.position.checked_add(length) {
            Some(end) if end <= self.data.len() => {
                let bytes = &self.data[self.position..end];
                self.position = end;
                Ok(bytes)
            }
            _ => Err(OutOfBounds),
        }
    }

    /// Read an ECMA-335 compressed unsigned integer (II.23.2).
    ///
    /// One byte if the value fits 7 bits, two bytes for 14 bits
    /// (`10xxxxxx`-prefixed), four bytes for 29 bits (`110xxxxx`-prefixed).
    ///
    /// # Errors
    /// Returns an error if the slice is exhausted or the prefix is invalid.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first = self.read_le::<u8>()?;

        if first & 0x80 == 0 {
            return Ok(u32::from(first));
        }

        if first & 0xC0 == 0x80 {
            let second = self.read_le::<u8>()?;
            return Ok((u32::from(first & 0x3F) << 8) | u32::from(second));
        }

        if first & 0xE0 == 0xC0 {
            let second = self.read_le::<u8>()?;
            let third = self.read_le::<u8>()?;
            let fourth = self.read_le::<u8>()?;
            return Ok((u32::from(first & 0x1F) << 24)
                | (u32::from(second) << 16)
                | (u32::from(third) << 8)
                | u32::from(fourth));
        }

        Err(malformed_error!(
            "Invalid compressed integer prefix - 0x{:02x}",
            first
        ))
    }

    /// Read a `TypeDefOrRefOrSpec` coded token (II.23.2.8).
    ///
    /// The compressed value carries the target table in its low two bits and
    /// the row index in the remaining bits.
    ///
    /// # Errors
    /// Returns an error if the compressed value is invalid or the tag does not
    /// name a valid target table.
    pub fn read_compressed_token(&mut self) -> Result<Token> {
        let value = self.read_compressed_uint()?;

        let rid = value >> 2;
        let table: u32 = match value & 0x3 {
            0 => 0x02, // TypeDef
            1 => 0x01, // TypeRef
            2 => 0x1B, // TypeSpec
            _ => {
                return Err(malformed_error!(
                    "Invalid TypeDefOrRefOrSpec tag in coded token - {}",
                    value & 0x3
                ))
            }
        };

        Ok(Token::new((table << 24) | rid))
    }

    /// Read a serialized string ("SerString"): a compressed length prefix
    /// followed by UTF-8 bytes. A single `0xFF` byte denotes the null string,
    /// distinct from a zero-length string.
    ///
    /// # Errors
    /// Returns an error on truncated data or invalid UTF-8.
    pub fn read_ser_string(&mut self) -> Result<Option<String>> {
        if self.peek_byte()? == 0xFF {
            self.advance()?;
            return Ok(None);
        }

        let length = self.read_compressed_uint()? as usize;
        let bytes = self.read_bytes(length)?;

        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Some(text.to_string())),
            Err(_) => Err(malformed_error!(
                "Invalid UTF-8 in serialized string at offset {}",
                self.position - length
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_movement() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut parser = Parser::new(&data);

        assert!(parser.has_more_data());
        assert_eq!(parser.peek_byte().unwrap(), 0x01);
        assert_eq!(parser.pos(), 0);

        parser.advance().unwrap();
        assert_eq!(parser.peek_byte().unwrap(), 0x02);

        parser.advance_by(2).unwrap();
        assert_eq!(parser.remaining(), 1);

        parser.seek(0).unwrap();
        assert_eq!(parser.read_le::<u32>().unwrap(), 0x0403_0201);
        assert!(!parser.has_more_data());
        assert!(parser.advance().is_err());
    }

    #[test]
    fn compressed_uint() {
        // The three widths from II.23.2 plus the boundary values
        let cases: &[(&[u8], u32)] = &[
            (&[0x03], 0x03),
            (&[0x7F], 0x7F),
            (&[0x80, 0x80], 0x80),
            (&[0xAE, 0x57], 0x2E57),
            (&[0xBF, 0xFF], 0x3FFF),
            (&[0xC0, 0x00, 0x40, 0x00], 0x4000),
            (&[0xDF, 0xFF, 0xFF, 0xFF], 0x1FFF_FFFF),
        ];

        for (bytes, expected) in cases {
            let mut parser = Parser::new(bytes);
            assert_eq!(parser.read_compressed_uint().unwrap(), *expected);
            assert_eq!(parser.pos(), bytes.len());
        }

        let mut parser = Parser::new(&[0xE0]);
        assert!(parser.read_compressed_uint().is_err());
    }

    #[test]
    fn compressed_token() {
        let mut parser = Parser::new(&[0x42]);
        assert_eq!(
            parser.read_compressed_token().unwrap(),
            Token::new(0x1B00_0010)
        );

        let mut parser = Parser::new(&[0x35]);
        assert_eq!(
            parser.read_compressed_token().unwrap(),
            Token::new(0x0100_000D)
        );

        let mut parser = Parser::new(&[0x34]);
        assert_eq!(
            parser.read_compressed_token().unwrap(),
            Token::new(0x0200_000D)
        );
    }

    #[test]
    fn ser_string() {
        let mut parser = Parser::new(&[0x05, b'H', b'e', b'l', b'l', b'o']);
        assert_eq!(parser.read_ser_string().unwrap().as_deref(), Some("Hello"));

        // Null sentinel is not the empty string
        let mut parser = Parser::new(&[0xFF]);
        assert_eq!(parser.read_ser_string().unwrap(), None);

        let mut parser = Parser::new(&[0x00]);
        assert_eq!(parser.read_ser_string().unwrap().as_deref(), Some(""));

        // Truncated payload
        let mut parser = Parser::new(&[0x05, b'H', b'i']);
        assert!(parser.read_ser_string().is_err());
    }
}
