//! Recursive-descent parser for signature blobs.

use crate::{
    metadata::signatures::{
        ArrayDimension, SignatureArray, SignatureField, SignatureMethod, SignatureModifier,
        SignatureParameter, SignaturePointer, SignatureProperty, SignatureSzArray, TypeSignature,
        ELEMENT_TYPE, SIGNATURE,
    },
    Error::RecursionLimit,
    Parser, Result,
};

/// Nesting bound for recursive grammar productions. Signatures deeper than
/// this are rejected rather than risking stack exhaustion on hostile input.
const MAX_RECURSION_DEPTH: usize = 50;

/// Parser over one signature blob.
///
/// One instance parses one blob; the entry points (`parse_method_signature`,
/// `parse_field_signature`, `parse_property_signature`) consume the leading
/// convention byte themselves.
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a parser over `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            depth: 0,
        }
    }

    fn parse_type(&mut self) -> Result<TypeSignature> {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }
        self.depth += 1;
        let result = self.parse_type_inner();
        self.depth -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> Result<TypeSignature> {
        let current_byte = self.parser.read_le::<u8>()?;
        match current_byte {
            ELEMENT_TYPE::VOID => Ok(TypeSignature::Void),
            ELEMENT_TYPE::BOOLEAN => Ok(TypeSignature::Boolean),
            ELEMENT_TYPE::CHAR => Ok(TypeSignature::Char),
            ELEMENT_TYPE::I1 => Ok(TypeSignature::I1),
            ELEMENT_TYPE::U1 => Ok(TypeSignature::U1),
            ELEMENT_TYPE::I2 => Ok(TypeSignature::I2),
            ELEMENT_TYPE::U2 => Ok(TypeSignature::U2),
            ELEMENT_TYPE::I4 => Ok(TypeSignature::I4),
            ELEMENT_TYPE::U4 => Ok(TypeSignature::U4),
            ELEMENT_TYPE::I8 => Ok(TypeSignature::I8),
            ELEMENT_TYPE::U8 => Ok(TypeSignature::U8),
            ELEMENT_TYPE::R4 => Ok(TypeSignature::R4),
            ELEMENT_TYPE::R8 => Ok(TypeSignature::R8),
            ELEMENT_TYPE::STRING => Ok(TypeSignature::String),
            ELEMENT_TYPE::PTR => Ok(TypeSignature::Ptr(SignaturePointer {
                modifiers: self.parse_custom_mods()?,
                base: Box::new(self.parse_type()?),
            })),
            ELEMENT_TYPE::BYREF => Ok(TypeSignature::ByRef(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::VALUETYPE => {
                Ok(TypeSignature::ValueType(self.parser.read_compressed_token()?))
            }
            ELEMENT_TYPE::CLASS => Ok(TypeSignature::Class(self.parser.read_compressed_token()?)),
            ELEMENT_TYPE::VAR => Ok(TypeSignature::GenericParamType(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::ARRAY => {
                let base = self.parse_type()?;
                let rank = self.parser.read_compressed_uint()?;

                let num_sizes = self.parser.read_compressed_uint()?;
                let mut dimensions = Vec::with_capacity(num_sizes as usize);
                for _ in 0..num_sizes {
                    dimensions.push(ArrayDimension {
                        size: Some(self.parser.read_compressed_uint()?),
                        lower_bound: None,
                    });
                }

                let num_lower_bounds = self.parser.read_compressed_uint()?;
                for index in 0..num_lower_bounds as usize {
                    let lower_bound = self.parser.read_compressed_uint()?;
                    match dimensions.get_mut(index) {
                        Some(dimension) => dimension.lower_bound = Some(lower_bound),
                        None => dimensions.push(ArrayDimension {
                            size: None,
                            lower_bound: Some(lower_bound),
                        }),
                    }
                }

                Ok(TypeSignature::Array(SignatureArray {
                    base: Box::new(base),
                    rank,
                    dimensions,
                }))
            }
            ELEMENT_TYPE::GENERICINST => {
                let base = self.parse_type()?;
                let arg_count = self.parser.read_compressed_uint()?;

                let mut args = Vec::with_capacity(arg_count as usize);
                for _ in 0..arg_count {
                    args.push(self.parse_type()?);
                }

                Ok(TypeSignature::GenericInst(Box::new(base), args))
            }
            ELEMENT_TYPE::TYPEDBYREF => Ok(TypeSignature::TypedByRef),
            ELEMENT_TYPE::I => Ok(TypeSignature::I),
            ELEMENT_TYPE::U => Ok(TypeSignature::U),
            ELEMENT_TYPE::FNPTR => Ok(TypeSignature::FnPtr(Box::new(
                self.parse_method_signature()?,
            ))),
            ELEMENT_TYPE::OBJECT => Ok(TypeSignature::Object),
            ELEMENT_TYPE::SZARRAY => Ok(TypeSignature::SzArray(SignatureSzArray {
                modifiers: self.parse_custom_mods()?,
                base: Box::new(self.parse_type()?),
            })),
            ELEMENT_TYPE::MVAR => Ok(TypeSignature::GenericParamMethod(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::CMOD_REQD => {
                let mut mods = vec![self.parser.read_compressed_token()?];
                mods.extend(
                    self.parse_custom_mods()?
                        .into_iter()
                        .map(|modifier| modifier.modifier),
                );
                Ok(TypeSignature::ModifiedRequired(mods))
            }
            ELEMENT_TYPE::CMOD_OPT => {
                let mut mods = vec![self.parser.read_compressed_token()?];
                mods.extend(
                    self.parse_custom_mods()?
                        .into_iter()
                        .map(|modifier| modifier.modifier),
                );
                Ok(TypeSignature::ModifiedOptional(mods))
            }
            ELEMENT_TYPE::SENTINEL => Ok(TypeSignature::Sentinel),
            ELEMENT_TYPE::PINNED => Ok(TypeSignature::Pinned(Box::new(self.parse_type()?))),
            _ => Err(malformed_error!(
                "Unsupported ELEMENT_TYPE - 0x{:02x}",
                current_byte
            )),
        }
    }

    fn parse_custom_mods(&mut self) -> Result<Vec<SignatureModifier>> {
        let mut mods = Vec::new();

        while self.parser.has_more_data() {
            let next_byte = self.parser.peek_byte()?;
            if next_byte != ELEMENT_TYPE::CMOD_OPT && next_byte != ELEMENT_TYPE::CMOD_REQD {
                break;
            }

            self.parser.advance()?;
            mods.push(SignatureModifier {
                required: next_byte == ELEMENT_TYPE::CMOD_REQD,
                modifier: self.parser.read_compressed_token()?,
            });
        }

        Ok(mods)
    }

    fn parse_param(&mut self) -> Result<SignatureParameter> {
        let modifiers = self.parse_custom_mods()?;

        let mut by_ref = false;
        if self.parser.peek_byte()? == ELEMENT_TYPE::BYREF {
            self.parser.advance()?;
            by_ref = true;
        }

        Ok(SignatureParameter {
            modifiers,
            by_ref,
            base: self.parse_type()?,
        })
    }

    /// Parse a method signature (II.23.2.1), starting at the convention byte.
    ///
    /// # Errors
    /// Returns an error on truncated data, an invalid element tag, or
    /// excessive nesting.
    pub fn parse_method_signature(&mut self) -> Result<SignatureMethod> {
        let convention = self.parser.read_le::<u8>()?;
        let calling_convention = convention & 0x0F;

        let mut method = SignatureMethod {
            has_this: convention & SIGNATURE::HAS_THIS != 0,
            explicit_this: convention & SIGNATURE::EXPLICIT_THIS != 0,
            default: calling_convention == SIGNATURE::DEFAULT,
            vararg: calling_convention == SIGNATURE::VARARG,
            cdecl: calling_convention == SIGNATURE::C,
            stdcall: calling_convention == SIGNATURE::STDCALL,
            thiscall: calling_convention == SIGNATURE::THISCALL,
            fastcall: calling_convention == SIGNATURE::FASTCALL,
            param_count_generic: if convention & SIGNATURE::GENERIC != 0 {
                self.parser.read_compressed_uint()?
            } else {
                0
            },
            param_count: self.parser.read_compressed_uint()?,
            return_type: self.parse_param()?,
            params: Vec::new(),
            varargs: Vec::new(),
        };

        for _ in 0..method.param_count {
            if self.parser.peek_byte()? == ELEMENT_TYPE::SENTINEL {
                self.parser.advance()?;
                break;
            }

            method.params.push(self.parse_param()?);
        }

        // Everything after the sentinel belongs to the variadic tail
        if method.vararg && method.params.len() < method.param_count as usize {
            for _ in method.params.len()..method.param_count as usize {
                method.varargs.push(self.parse_param()?);
            }
        }

        Ok(method)
    }

    /// Parse a field signature (II.23.2.4), starting at the `FIELD` byte.
    ///
    /// # Errors
    /// Returns an error if the prolog is wrong or the type is malformed.
    pub fn parse_field_signature(&mut self) -> Result<SignatureField> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte != SIGNATURE::FIELD {
            return Err(malformed_error!(
                "SignatureField - invalid start - 0x{:02x}",
                head_byte
            ));
        }

        Ok(SignatureField {
            modifiers: self.parse_custom_mods()?,
            base: self.parse_type()?,
        })
    }

    /// Parse a property signature (II.23.2.5), starting at the `PROPERTY`
    /// byte.
    ///
    /// # Errors
    /// Returns an error if the prolog is wrong or any component is
    /// malformed.
    pub fn parse_property_signature(&mut self) -> Result<SignatureProperty> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte & SIGNATURE::PROPERTY == 0 {
            return Err(malformed_error!(
                "SignatureProperty - invalid start - 0x{:02x}",
                head_byte
            ));
        }

        let has_this = head_byte & SIGNATURE::HAS_THIS != 0;

        let param_count = self.parser.read_compressed_uint()?;
        let modifiers = self.parse_custom_mods()?;
        let base = self.parse_type()?;

        let mut params = Vec::with_capacity(param_count as usize);
        for _ in 0..param_count {
            params.push(self.parse_param()?);
        }

        Ok(SignatureProperty {
            has_this,
            modifiers,
            base,
            params,
        })
    }

    /// Parse a bare type production. Used for element value decoding, where
    /// a type reference stands alone without a signature prolog.
    ///
    /// # Errors
    /// Returns an error on truncated or malformed data.
    pub fn parse_type_signature(&mut self) -> Result<TypeSignature> {
        self.parse_type()
    }
}
