//! Signature blob encoders, the exact inverse of the parser.

use crate::{
    metadata::{
        signatures::{
            ArrayDimension, SignatureField, SignatureMethod, SignatureModifier,
            SignatureParameter, SignatureProperty, TypeSignature, ELEMENT_TYPE, SIGNATURE,
        },
        token::Token,
    },
    utils::write_compressed_uint,
    Error, Result,
};

/// Encode a token as a compressed `TypeDefOrRefOrSpec` value (II.23.2.8).
fn encode_type_def_or_ref_coded_index(token: Token) -> Result<u32> {
    let tag = match token.table() {
        0x02 => 0, // TypeDef
        0x01 => 1, // TypeRef
        0x1B => 2, // TypeSpec
        table => {
            return Err(Error::ModificationInvalid(format!(
                "Token {token} (table 0x{table:02x}) cannot be encoded as TypeDefOrRefOrSpec"
            )))
        }
    };

    Ok((token.row() << 2) | tag)
}

/// The wire format carries one leading run of values, one per dimension from
/// the first; a value after a gap has no encoding.
fn contiguous_dimension_prefix(
    dimensions: &[ArrayDimension],
    field: impl Fn(&ArrayDimension) -> Option<u32>,
) -> Result<Vec<u32>> {
    let values: Vec<u32> = dimensions.iter().map_while(&field).collect();
    if dimensions[values.len()..].iter().any(|d| field(d).is_some()) {
        return Err(Error::ModificationInvalid(
            "Array dimension sizes and lower bounds must form a contiguous run from the first \
             dimension"
                .to_string(),
        ));
    }
    Ok(values)
}

fn encode_custom_mods(mods: &[SignatureModifier], buffer: &mut Vec<u8>) -> Result<()> {
    for modifier in mods {
        buffer.push(if modifier.required {
            ELEMENT_TYPE::CMOD_REQD
        } else {
            ELEMENT_TYPE::CMOD_OPT
        });
        write_compressed_uint(encode_type_def_or_ref_coded_index(modifier.modifier)?, buffer)?;
    }

    Ok(())
}

fn encode_mod_tokens(tag: u8, tokens: &[Token], buffer: &mut Vec<u8>) -> Result<()> {
    if tokens.is_empty() {
        return Err(Error::ModificationInvalid(
            "Custom modifier list cannot be empty".to_string(),
        ));
    }

    for token in tokens {
        buffer.push(tag);
        write_compressed_uint(encode_type_def_or_ref_coded_index(*token)?, buffer)?;
    }

    Ok(())
}

fn encode_type(signature: &TypeSignature, buffer: &mut Vec<u8>) -> Result<()> {
    match signature {
        TypeSignature::Void => buffer.push(ELEMENT_TYPE::VOID),
        TypeSignature::Boolean => buffer.push(ELEMENT_TYPE::BOOLEAN),
        TypeSignature::Char => buffer.push(ELEMENT_TYPE::CHAR),
        TypeSignature::I1 => buffer.push(ELEMENT_TYPE::I1),
        TypeSignature::U1 => buffer.push(ELEMENT_TYPE::U1),
        TypeSignature::I2 => buffer.push(ELEMENT_TYPE::I2),
        TypeSignature::U2 => buffer.push(ELEMENT_TYPE::U2),
        TypeSignature::I4 => buffer.push(ELEMENT_TYPE::I4),
        TypeSignature::U4 => buffer.push(ELEMENT_TYPE::U4),
        TypeSignature::I8 => buffer.push(ELEMENT_TYPE::I8),
        TypeSignature::U8 => buffer.push(ELEMENT_TYPE::U8),
        TypeSignature::R4 => buffer.push(ELEMENT_TYPE::R4),
        TypeSignature::R8 => buffer.push(ELEMENT_TYPE::R8),
        TypeSignature::String => buffer.push(ELEMENT_TYPE::STRING),
        TypeSignature::Ptr(pointer) => {
            buffer.push(ELEMENT_TYPE::PTR);
            encode_custom_mods(&pointer.modifiers, buffer)?;
            encode_type(&pointer.base, buffer)?;
        }
        TypeSignature::ByRef(inner) => {
            buffer.push(ELEMENT_TYPE::BYREF);
            encode_type(inner, buffer)?;
        }
        TypeSignature::ValueType(token) => {
            buffer.push(ELEMENT_TYPE::VALUETYPE);
            write_compressed_uint(encode_type_def_or_ref_coded_index(*token)?, buffer)?;
        }
        TypeSignature::Class(token) => {
            buffer.push(ELEMENT_TYPE::CLASS);
            write_compressed_uint(encode_type_def_or_ref_coded_index(*token)?, buffer)?;
        }
        TypeSignature::GenericParamType(index) => {
            buffer.push(ELEMENT_TYPE::VAR);
            write_compressed_uint(*index, buffer)?;
        }
        TypeSignature::Array(array) => {
            buffer.push(ELEMENT_TYPE::ARRAY);
            encode_type(&array.base, buffer)?;
            write_compressed_uint(array.rank, buffer)?;

            let sizes =
                contiguous_dimension_prefix(&array.dimensions, |dimension| dimension.size)?;
            write_compressed_uint(sizes.len() as u32, buffer)?;
            for size in sizes {
                write_compressed_uint(size, buffer)?;
            }

            let lower_bounds =
                contiguous_dimension_prefix(&array.dimensions, |dimension| dimension.lower_bound)?;
            write_compressed_uint(lower_bounds.len() as u32, buffer)?;
            for lower_bound in lower_bounds {
                write_compressed_uint(lower_bound, buffer)?;
            }
        }
        TypeSignature::GenericInst(base, args) => {
            buffer.push(ELEMENT_TYPE::GENERICINST);
            encode_type(base, buffer)?;
            write_compressed_uint(args.len() as u32, buffer)?;
            for arg in args {
                encode_type(arg, buffer)?;
            }
        }
        TypeSignature::TypedByRef => buffer.push(ELEMENT_TYPE::TYPEDBYREF),
        TypeSignature::I => buffer.push(ELEMENT_TYPE::I),
        TypeSignature::U => buffer.push(ELEMENT_TYPE::U),
        TypeSignature::FnPtr(method) => {
            buffer.push(ELEMENT_TYPE::FNPTR);
            encode_method(method, buffer)?;
        }
        TypeSignature::Object => buffer.push(ELEMENT_TYPE::OBJECT),
        TypeSignature::SzArray(array) => {
            buffer.push(ELEMENT_TYPE::SZARRAY);
            encode_custom_mods(&array.modifiers, buffer)?;
            encode_type(&array.base, buffer)?;
        }
        TypeSignature::GenericParamMethod(index) => {
            buffer.push(ELEMENT_TYPE::MVAR);
            write_compressed_uint(*index, buffer)?;
        }
        TypeSignature::ModifiedRequired(tokens) => {
            encode_mod_tokens(ELEMENT_TYPE::CMOD_REQD, tokens, buffer)?;
        }
        TypeSignature::ModifiedOptional(tokens) => {
            encode_mod_tokens(ELEMENT_TYPE::CMOD_OPT, tokens, buffer)?;
        }
        TypeSignature::Sentinel => buffer.push(ELEMENT_TYPE::SENTINEL),
        TypeSignature::Pinned(inner) => {
            buffer.push(ELEMENT_TYPE::PINNED);
            encode_type(inner, buffer)?;
        }
        TypeSignature::Unknown => {
            return Err(Error::ModificationInvalid(
                "Cannot encode an unknown type signature".to_string(),
            ))
        }
    }

    Ok(())
}

fn encode_parameter(parameter: &SignatureParameter, buffer: &mut Vec<u8>) -> Result<()> {
    encode_custom_mods(&parameter.modifiers, buffer)?;
    if parameter.by_ref {
        buffer.push(ELEMENT_TYPE::BYREF);
    }
    encode_type(&parameter.base, buffer)
}

fn encode_method(signature: &SignatureMethod, buffer: &mut Vec<u8>) -> Result<()> {
    let mut convention: u8 = if signature.vararg {
        SIGNATURE::VARARG
    } else if signature.cdecl {
        SIGNATURE::C
    } else if signature.stdcall {
        SIGNATURE::STDCALL
    } else if signature.thiscall {
        SIGNATURE::THISCALL
    } else if signature.fastcall {
        SIGNATURE::FASTCALL
    } else {
        SIGNATURE::DEFAULT
    };

    if signature.has_this {
        convention |= SIGNATURE::HAS_THIS;
    }
    if signature.explicit_this {
        convention |= SIGNATURE::EXPLICIT_THIS;
    }
    if signature.param_count_generic > 0 {
        convention |= SIGNATURE::GENERIC;
    }

    buffer.push(convention);

    if signature.param_count_generic > 0 {
        write_compressed_uint(signature.param_count_generic, buffer)?;
    }

    let param_count = signature.params.len() + signature.varargs.len();
    write_compressed_uint(param_count as u32, buffer)?;

    encode_parameter(&signature.return_type, buffer)?;

    for parameter in &signature.params {
        encode_parameter(parameter, buffer)?;
    }

    if !signature.varargs.is_empty() {
        buffer.push(ELEMENT_TYPE::SENTINEL);
        for parameter in &signature.varargs {
            encode_parameter(parameter, buffer)?;
        }
    }

    Ok(())
}

/// Encode a method signature into a fresh blob.
///
/// # Errors
/// Returns an error if a token cannot be expressed as a coded index or a
/// component is unencodable.
pub fn encode_method_signature(signature: &SignatureMethod) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    encode_method(signature, &mut buffer)?;
    Ok(buffer)
}

/// Encode a field signature into a fresh blob, leading `FIELD` byte
/// included.
///
/// # Errors
/// Returns an error if a component is unencodable.
pub fn encode_field_signature(signature: &SignatureField) -> Result<Vec<u8>> {
    let mut buffer = vec![SIGNATURE::FIELD];
    encode_custom_mods(&signature.modifiers, &mut buffer)?;
    encode_type(&signature.base, &mut buffer)?;
    Ok(buffer)
}

/// Encode a property signature into a fresh blob, leading `PROPERTY` byte
/// included.
///
/// # Errors
/// Returns an error if a component is unencodable.
pub fn encode_property_signature(signature: &SignatureProperty) -> Result<Vec<u8>> {
    let mut head = SIGNATURE::PROPERTY;
    if signature.has_this {
        head |= SIGNATURE::HAS_THIS;
    }

    let mut buffer = vec![head];
    write_compressed_uint(signature.params.len() as u32, &mut buffer)?;
    encode_custom_mods(&signature.modifiers, &mut buffer)?;
    encode_type(&signature.base, &mut buffer)?;

    for parameter in &signature.params {
        encode_parameter(parameter, &mut buffer)?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::signatures::{
        parse_field_signature, parse_method_signature, parse_property_signature, SignatureArray,
        SignatureSzArray,
    };

    #[test]
    fn field_round_trip() {
        let original = [SIGNATURE::FIELD, ELEMENT_TYPE::I4];
        let parsed = parse_field_signature(&original).unwrap();
        assert_eq!(encode_field_signature(&parsed).unwrap(), original);

        // With a required modifier
        let original = [
            SIGNATURE::FIELD,
            ELEMENT_TYPE::CMOD_REQD,
            0x49,
            ELEMENT_TYPE::I4,
        ];
        let parsed = parse_field_signature(&original).unwrap();
        assert_eq!(encode_field_signature(&parsed).unwrap(), original);
    }

    #[test]
    fn method_round_trip() {
        // instance string M(int32, bool&)
        let original = [
            0x20,
            0x02,
            ELEMENT_TYPE::STRING,
            ELEMENT_TYPE::I4,
            ELEMENT_TYPE::BYREF,
            ELEMENT_TYPE::BOOLEAN,
        ];
        let parsed = parse_method_signature(&original).unwrap();
        assert_eq!(encode_method_signature(&parsed).unwrap(), original);

        // vararg with sentinel
        let original = [
            0x05,
            0x02,
            ELEMENT_TYPE::VOID,
            ELEMENT_TYPE::I4,
            ELEMENT_TYPE::SENTINEL,
            ELEMENT_TYPE::STRING,
        ];
        let parsed = parse_method_signature(&original).unwrap();
        assert_eq!(encode_method_signature(&parsed).unwrap(), original);

        // generic
        let original = [0x30, 0x01, 0x01, ELEMENT_TYPE::VOID, ELEMENT_TYPE::MVAR, 0x00];
        let parsed = parse_method_signature(&original).unwrap();
        assert_eq!(encode_method_signature(&parsed).unwrap(), original);
    }

    #[test]
    fn property_round_trip() {
        let original = [0x28, 0x01, ELEMENT_TYPE::STRING, ELEMENT_TYPE::I4];
        let parsed = parse_property_signature(&original).unwrap();
        assert_eq!(encode_property_signature(&parsed).unwrap(), original);
    }

    #[test]
    fn composite_types() {
        let signature = SignatureField {
            modifiers: Vec::new(),
            base: TypeSignature::GenericInst(
                Box::new(TypeSignature::Class(Token::new(0x0100_0012))),
                vec![
                    TypeSignature::I4,
                    TypeSignature::SzArray(SignatureSzArray {
                        modifiers: Vec::new(),
                        base: Box::new(TypeSignature::String),
                    }),
                ],
            ),
        };

        let encoded = encode_field_signature(&signature).unwrap();
        assert_eq!(
            encoded,
            vec![
                SIGNATURE::FIELD,
                ELEMENT_TYPE::GENERICINST,
                ELEMENT_TYPE::CLASS,
                0x49,
                0x02,
                ELEMENT_TYPE::I4,
                ELEMENT_TYPE::SZARRAY,
                ELEMENT_TYPE::STRING,
            ]
        );
        assert_eq!(parse_field_signature(&encoded).unwrap(), signature);
    }

    #[test]
    fn multi_dimensional_array_round_trip() {
        let signature = SignatureField {
            modifiers: Vec::new(),
            base: TypeSignature::Array(SignatureArray {
                base: Box::new(TypeSignature::R8),
                rank: 2,
                dimensions: vec![
                    crate::metadata::signatures::ArrayDimension {
                        size: Some(4),
                        lower_bound: Some(0),
                    },
                    crate::metadata::signatures::ArrayDimension {
                        size: Some(3),
                        lower_bound: Some(0),
                    },
                ],
            }),
        };

        let encoded = encode_field_signature(&signature).unwrap();
        assert_eq!(parse_field_signature(&encoded).unwrap(), signature);
    }

    #[test]
    fn gapped_array_dimensions_rejected() {
        let signature = SignatureField {
            modifiers: Vec::new(),
            base: TypeSignature::Array(SignatureArray {
                base: Box::new(TypeSignature::I4),
                rank: 3,
                dimensions: vec![
                    ArrayDimension {
                        size: Some(2),
                        lower_bound: None,
                    },
                    ArrayDimension {
                        size: None,
                        lower_bound: None,
                    },
                    // A size after a gap cannot be expressed on the wire
                    ArrayDimension {
                        size: Some(4),
                        lower_bound: None,
                    },
                ],
            }),
        };

        assert!(matches!(
            encode_field_signature(&signature),
            Err(Error::ModificationInvalid(_))
        ));
    }

    #[test]
    fn foreign_token_rejected() {
        let signature = SignatureField {
            modifiers: Vec::new(),
            base: TypeSignature::Class(Token::new(0x0600_0001)),
        };
        assert!(encode_field_signature(&signature).is_err());
    }
}
