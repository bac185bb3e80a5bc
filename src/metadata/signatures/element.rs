//! Element value codec for constants and custom-attribute arguments
//! (ECMA-335 II.22.9, II.23.3).
//!
//! Values are typed by a [`TypeSignature`], so decoding needs the declared
//! type, and enum or `System.Type` references additionally need a
//! [`TypeResolver`] to find out what actually sits behind the token. The
//! encoder is value-driven; [`element_size`] always agrees with the bytes
//! [`write_element`] emits.

use crate::{
    metadata::{
        signatures::{TypeSignature, ELEMENT_TYPE},
        typesystem::{TypeName, TypeResolver},
    },
    utils::{ser_string_size, write_ser_string},
    Error, Parser, Result,
};

/// A decoded element value with its exact declared width.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementValue {
    /// `bool`.
    Boolean(bool),
    /// UTF-16 code unit.
    Char(char),
    /// Signed 8-bit integer.
    I1(i8),
    /// Unsigned 8-bit integer.
    U1(u8),
    /// Signed 16-bit integer.
    I2(i16),
    /// Unsigned 16-bit integer.
    U2(u16),
    /// Signed 32-bit integer.
    I4(i32),
    /// Unsigned 32-bit integer.
    U4(u32),
    /// Signed 64-bit integer.
    I8(i64),
    /// Unsigned 64-bit integer.
    U8(u64),
    /// 32-bit IEEE-754 float.
    R4(f32),
    /// 64-bit IEEE-754 float.
    R8(f64),
    /// String; `None` is the null string (`0xFF` sentinel).
    String(Option<String>),
    /// `System.Type` constant, stored as an assembly-qualified name.
    Type(TypeName),
}

/// Read one element value of the declared type.
///
/// Primitives map to fixed-width little-endian reads. `Object` reads an
/// embedded field-or-prop type tag first. `Class`/`ValueType` go through the
/// resolver: enums decode as their underlying primitive, `System.Type` as a
/// serialized assembly-qualified name.
///
/// # Errors
/// Returns [`Error::TypeNotFound`] when a referenced token does not resolve,
/// [`Error::UnsupportedElement`] for types that have no element encoding, and
/// a malformed error for truncated or invalid data.
pub fn read_element(
    parser: &mut Parser,
    signature: &TypeSignature,
    resolver: &dyn TypeResolver,
) -> Result<ElementValue> {
    match signature {
        TypeSignature::Boolean => Ok(ElementValue::Boolean(parser.read_le::<u8>()? != 0)),
        TypeSignature::Char => {
            let unit = parser.read_le::<u16>()?;
            match char::from_u32(u32::from(unit)) {
                Some(value) => Ok(ElementValue::Char(value)),
                None => Err(malformed_error!(
                    "Invalid character element - 0x{:04x}",
                    unit
                )),
            }
        }
        TypeSignature::I1 => Ok(ElementValue::I1(parser.read_le()?)),
        TypeSignature::U1 => Ok(ElementValue::U1(parser.read_le()?)),
        TypeSignature::I2 => Ok(ElementValue::I2(parser.read_le()?)),
        TypeSignature::U2 => Ok(ElementValue::U2(parser.read_le()?)),
        TypeSignature::I4 => Ok(ElementValue::I4(parser.read_le()?)),
        TypeSignature::U4 => Ok(ElementValue::U4(parser.read_le()?)),
        TypeSignature::I8 => Ok(ElementValue::I8(parser.read_le()?)),
        TypeSignature::U8 => Ok(ElementValue::U8(parser.read_le()?)),
        TypeSignature::R4 => Ok(ElementValue::R4(parser.read_le()?)),
        TypeSignature::R8 => Ok(ElementValue::R8(parser.read_le()?)),
        TypeSignature::String => Ok(ElementValue::String(parser.read_ser_string()?)),
        TypeSignature::Object => read_boxed(parser, resolver),
        TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
            let Some(target) = resolver.resolve(signature) else {
                return Err(Error::TypeNotFound(*token));
            };

            if target.namespace == "System" && target.name == "Type" {
                return read_type_name(parser);
            }

            if target.is_enum() {
                let Some(underlying) = target.enum_underlying_type() else {
                    return Err(malformed_error!(
                        "Enum {} has no instance field to derive its underlying type from",
                        target.full_name()
                    ));
                };
                return read_element(parser, &underlying, resolver);
            }

            Err(Error::UnsupportedElement(match signature {
                TypeSignature::ValueType(_) => ELEMENT_TYPE::VALUETYPE,
                _ => ELEMENT_TYPE::CLASS,
            }))
        }
        other => Err(Error::UnsupportedElement(element_tag(other))),
    }
}

/// Read a boxed value: a field-or-prop type tag followed by the value.
fn read_boxed(parser: &mut Parser, resolver: &dyn TypeResolver) -> Result<ElementValue> {
    let tag = parser.read_le::<u8>()?;
    let inner = match tag {
        ELEMENT_TYPE::BOOLEAN => TypeSignature::Boolean,
        ELEMENT_TYPE::CHAR => TypeSignature::Char,
        ELEMENT_TYPE::I1 => TypeSignature::I1,
        ELEMENT_TYPE::U1 => TypeSignature::U1,
        ELEMENT_TYPE::I2 => TypeSignature::I2,
        ELEMENT_TYPE::U2 => TypeSignature::U2,
        ELEMENT_TYPE::I4 => TypeSignature::I4,
        ELEMENT_TYPE::U4 => TypeSignature::U4,
        ELEMENT_TYPE::I8 => TypeSignature::I8,
        ELEMENT_TYPE::U8 => TypeSignature::U8,
        ELEMENT_TYPE::R4 => TypeSignature::R4,
        ELEMENT_TYPE::R8 => TypeSignature::R8,
        ELEMENT_TYPE::STRING => TypeSignature::String,
        ELEMENT_TYPE::TYPE => return read_type_name(parser),
        ELEMENT_TYPE::ENUM => {
            let Some(text) = parser.read_ser_string()? else {
                return Err(malformed_error!("Boxed enum with a null type name"));
            };
            let name = TypeName::parse(&text)?;
            let Some(target) = resolver.resolve_name(&name) else {
                return Err(Error::UnsupportedElement(ELEMENT_TYPE::ENUM));
            };
            let Some(underlying) = target.enum_underlying_type() else {
                return Err(malformed_error!(
                    "Enum {} has no instance field to derive its underlying type from",
                    target.full_name()
                ));
            };
            return read_element(parser, &underlying, resolver);
        }
        other => return Err(Error::UnsupportedElement(other)),
    };

    read_element(parser, &inner, resolver)
}

fn read_type_name(parser: &mut Parser) -> Result<ElementValue> {
    match parser.read_ser_string()? {
        Some(text) => Ok(ElementValue::Type(TypeName::parse(&text)?)),
        None => Err(malformed_error!("Type element with a null type name")),
    }
}

/// Append an element value to `buffer`.
///
/// [`ElementValue::Type`] serializes its canonical assembly-qualified
/// spelling, which may be longer than the blob it was read from when that
/// blob omitted qualifiers.
///
/// # Errors
/// Returns an error if a character or string exceeds its encodable range.
pub fn write_element(value: &ElementValue, buffer: &mut Vec<u8>) -> Result<()> {
    match value {
        ElementValue::Boolean(v) => buffer.push(u8::from(*v)),
        ElementValue::Char(v) => {
            let Ok(unit) = u16::try_from(u32::from(*v)) else {
                return Err(Error::ModificationInvalid(format!(
                    "Character {v:?} does not fit a single UTF-16 unit"
                )));
            };
            buffer.extend_from_slice(&unit.to_le_bytes());
        }
        ElementValue::I1(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::U1(v) => buffer.push(*v),
        ElementValue::I2(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::U2(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::I4(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::U4(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::I8(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::U8(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::R4(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::R8(v) => buffer.extend_from_slice(&v.to_le_bytes()),
        ElementValue::String(v) => write_ser_string(v.as_deref(), buffer)?,
        ElementValue::Type(name) => write_ser_string(Some(&name.to_string()), buffer)?,
    }

    Ok(())
}

/// Number of bytes [`write_element`] emits for `value`.
#[must_use]
pub fn element_size(value: &ElementValue) -> u32 {
    match value {
        ElementValue::Boolean(_) | ElementValue::I1(_) | ElementValue::U1(_) => 1,
        ElementValue::Char(_) | ElementValue::I2(_) | ElementValue::U2(_) => 2,
        ElementValue::I4(_) | ElementValue::U4(_) | ElementValue::R4(_) => 4,
        ElementValue::I8(_) | ElementValue::U8(_) | ElementValue::R8(_) => 8,
        ElementValue::String(v) => ser_string_size(v.as_deref()),
        ElementValue::Type(name) => ser_string_size(Some(&name.to_string())),
    }
}

fn element_tag(signature: &TypeSignature) -> u8 {
    match signature {
        TypeSignature::Void => ELEMENT_TYPE::VOID,
        TypeSignature::Ptr(_) => ELEMENT_TYPE::PTR,
        TypeSignature::ByRef(_) => ELEMENT_TYPE::BYREF,
        TypeSignature::GenericParamType(_) => ELEMENT_TYPE::VAR,
        TypeSignature::Array(_) => ELEMENT_TYPE::ARRAY,
        TypeSignature::GenericInst(_, _) => ELEMENT_TYPE::GENERICINST,
        TypeSignature::TypedByRef => ELEMENT_TYPE::TYPEDBYREF,
        TypeSignature::I => ELEMENT_TYPE::I,
        TypeSignature::U => ELEMENT_TYPE::U,
        TypeSignature::FnPtr(_) => ELEMENT_TYPE::FNPTR,
        TypeSignature::SzArray(_) => ELEMENT_TYPE::SZARRAY,
        TypeSignature::GenericParamMethod(_) => ELEMENT_TYPE::MVAR,
        TypeSignature::ModifiedRequired(_) => ELEMENT_TYPE::CMOD_REQD,
        TypeSignature::ModifiedOptional(_) => ELEMENT_TYPE::CMOD_OPT,
        TypeSignature::Sentinel => ELEMENT_TYPE::SENTINEL,
        TypeSignature::Pinned(_) => ELEMENT_TYPE::PINNED,
        _ => ELEMENT_TYPE::END,
    }
}
