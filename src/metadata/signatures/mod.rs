//! Signature blob codec: recursive type descriptions and element values.
//!
//! The binary grammar is ECMA-335 II.23.2. Parsing is strict: every branch
//! consumes exactly the bytes the grammar prescribes and unknown element
//! tags fail loudly instead of being skipped. The encoders are the exact
//! inverse; a parsed signature re-encodes to an equivalent blob.
//!
//! # Reference
//! - [ECMA-335 Partition II, Section 23.2](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod element;
mod encoder;
mod parser;
mod types;

pub use element::{element_size, read_element, write_element, ElementValue};
pub use encoder::{
    encode_field_signature, encode_method_signature, encode_property_signature,
};
pub use parser::SignatureParser;
pub use types::{
    ArrayDimension, SignatureArray, SignatureField, SignatureMethod, SignatureModifier,
    SignatureParameter, SignaturePointer, SignatureProperty, SignatureSzArray, TypeSignature,
};

use crate::Result;

/// Element type tags used inside signature blobs (ECMA-335 II.23.1.16).
#[allow(missing_docs, non_snake_case)]
pub mod ELEMENT_TYPE {
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const PTR: u8 = 0x0F;
    pub const BYREF: u8 = 0x10;
    pub const VALUETYPE: u8 = 0x11;
    pub const CLASS: u8 = 0x12;
    pub const VAR: u8 = 0x13;
    pub const ARRAY: u8 = 0x14;
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    pub const I: u8 = 0x18;
    pub const U: u8 = 0x19;
    pub const FNPTR: u8 = 0x1B;
    pub const OBJECT: u8 = 0x1C;
    pub const SZARRAY: u8 = 0x1D;
    pub const MVAR: u8 = 0x1E;
    pub const CMOD_REQD: u8 = 0x1F;
    pub const CMOD_OPT: u8 = 0x20;
    pub const SENTINEL: u8 = 0x41;
    pub const PINNED: u8 = 0x45;
    /// `System.Type` in an element value (II.23.3).
    pub const TYPE: u8 = 0x50;
    /// Boxed value in an element value (II.23.3).
    pub const BOXED: u8 = 0x51;
    /// Enum type in an element value (II.23.3).
    pub const ENUM: u8 = 0x55;
}

/// Leading bytes and flags of signature blobs (ECMA-335 II.23.2.1-.5).
#[allow(missing_docs, non_snake_case)]
pub mod SIGNATURE {
    pub const DEFAULT: u8 = 0x00;
    pub const C: u8 = 0x01;
    pub const STDCALL: u8 = 0x02;
    pub const THISCALL: u8 = 0x03;
    pub const FASTCALL: u8 = 0x04;
    pub const VARARG: u8 = 0x05;
    pub const FIELD: u8 = 0x06;
    pub const PROPERTY: u8 = 0x08;
    pub const GENERIC: u8 = 0x10;
    pub const HAS_THIS: u8 = 0x20;
    pub const EXPLICIT_THIS: u8 = 0x40;
}

/// Parse a method signature blob.
///
/// # Errors
/// Returns an error if the blob is truncated or malformed.
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    SignatureParser::new(data).parse_method_signature()
}

/// Parse a field signature blob (leading `FIELD` byte included).
///
/// # Errors
/// Returns an error if the blob is truncated or malformed.
pub fn parse_field_signature(data: &[u8]) -> Result<SignatureField> {
    SignatureParser::new(data).parse_field_signature()
}

/// Parse a property signature blob (leading `PROPERTY` byte included).
///
/// # Errors
/// Returns an error if the blob is truncated or malformed.
pub fn parse_property_signature(data: &[u8]) -> Result<SignatureProperty> {
    SignatureParser::new(data).parse_property_signature()
}
