use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type covering every failure this library can return.
///
/// The variants map onto the error categories of the metadata layer:
/// structural corruption ([`Error::Malformed`], [`Error::OutOfBounds`]),
/// resolution failure ([`Error::TypeNotFound`]), unsupported encodings
/// ([`Error::UnsupportedElement`]) and self-consistency violations detected
/// before any bytes are emitted ([`Error::ModificationInvalid`]).
#[derive(Error, Debug)]
pub enum Error {
    /// An out of bound access was attempted while parsing heap or table data.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The metadata is damaged and could not be parsed.
    ///
    /// The error carries the source location where the malformation was
    /// detected, plus a message naming the offending structure (token, offset
    /// or tag) so the byte range can be located.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Recursion limit reached while decoding a nested signature.
    #[error("Reached the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A type referenced from a signature could not be resolved.
    ///
    /// Fatal for codec-internal dependencies (e.g. the underlying type of an
    /// enum constant); the comparer never surfaces this and treats an
    /// unresolved side as a non-match instead.
    #[error("Failed to resolve type - {0}")]
    TypeNotFound(Token),

    /// An element-type tag the constant codec does not recognize.
    ///
    /// Carries the offending tag so callers can diagnose unsupported
    /// extensions.
    #[error("Unsupported element type - 0x{0:02x}")]
    UnsupportedElement(u8),

    /// A value could not be serialized because it violates a structural
    /// constraint of the binary format (caught before any bytes are written).
    #[error("{0}")]
    ModificationInvalid(String),
}
