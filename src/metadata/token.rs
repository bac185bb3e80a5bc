use std::fmt;

/// A metadata token: the identity of one row within one loaded assembly.
///
/// The 32-bit value packs the table kind into the high byte and the 1-based
/// row position into the low 24 bits. Two entities with equal tokens denote
/// the same object within a single metadata root.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Builds a token from a table kind and a 1-based row position.
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table kind from the token (high byte).
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the 1-based row position from the token (low 24 bits).
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// True if this is the null token (value 0).
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts() {
        let token = Token::from_parts(0x17, 5);
        assert_eq!(token.value(), 0x1700_0005);
        assert_eq!(token.table(), 0x17);
        assert_eq!(token.row(), 5);
        assert!(!token.is_null());

        assert!(Token::new(0).is_null());
    }

    #[test]
    fn row_mask() {
        let token = Token::new(0x06FF_FFFF);
        assert_eq!(token.row(), 0x00FF_FFFF);
        assert_eq!(token.table(), 0x06);
    }

    #[test]
    fn display() {
        assert_eq!(Token::new(0x0200_0001).to_string(), "0x02000001");
    }
}
