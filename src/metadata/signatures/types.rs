//! In-memory representation of parsed signature blobs.

use std::fmt;

use crate::metadata::token::Token;

/// A type as encoded inside a signature blob (ECMA-335 II.23.2.12).
///
/// Reference variants (`Class`, `ValueType`, custom modifiers) carry the raw
/// `TypeDef`/`TypeRef`/`TypeSpec` token; resolution to an actual type happens
/// at a higher layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeSignature {
    /// Placeholder for an uninitialized signature.
    #[default]
    Unknown,
    /// `void`.
    Void,
    /// `bool`.
    Boolean,
    /// UTF-16 code unit.
    Char,
    /// Signed 8-bit integer.
    I1,
    /// Unsigned 8-bit integer.
    U1,
    /// Signed 16-bit integer.
    I2,
    /// Unsigned 16-bit integer.
    U2,
    /// Signed 32-bit integer.
    I4,
    /// Unsigned 32-bit integer.
    U4,
    /// Signed 64-bit integer.
    I8,
    /// Unsigned 64-bit integer.
    U8,
    /// 32-bit IEEE-754 float.
    R4,
    /// 64-bit IEEE-754 float.
    R8,
    /// `System.String`.
    String,
    /// Unmanaged pointer with optional custom modifiers.
    Ptr(SignaturePointer),
    /// Managed reference to the inner type.
    ByRef(Box<TypeSignature>),
    /// Value type reference (token into `TypeDef`/`TypeRef`/`TypeSpec`).
    ValueType(Token),
    /// Class reference (token into `TypeDef`/`TypeRef`/`TypeSpec`).
    Class(Token),
    /// Generic parameter of the enclosing type, by position.
    GenericParamType(u32),
    /// Multi-dimensional array with explicit shape.
    Array(SignatureArray),
    /// Generic instantiation: the open type and its type arguments.
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// `System.TypedReference`.
    TypedByRef,
    /// Native `System.IntPtr`.
    I,
    /// Native `System.UIntPtr`.
    U,
    /// Function pointer carrying a full method signature.
    FnPtr(Box<SignatureMethod>),
    /// `System.Object`.
    Object,
    /// Single-dimensional zero-based array.
    SzArray(SignatureSzArray),
    /// Generic parameter of the enclosing method, by position.
    GenericParamMethod(u32),
    /// Required custom modifier tokens.
    ModifiedRequired(Vec<Token>),
    /// Optional custom modifier tokens.
    ModifiedOptional(Vec<Token>),
    /// Vararg sentinel separating fixed from variadic arguments.
    Sentinel,
    /// Pinned local, wrapping the pinned type.
    Pinned(Box<TypeSignature>),
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Unknown => write!(f, "<unknown>"),
            TypeSignature::Void => write!(f, "System.Void"),
            TypeSignature::Boolean => write!(f, "System.Boolean"),
            TypeSignature::Char => write!(f, "System.Char"),
            TypeSignature::I1 => write!(f, "System.SByte"),
            TypeSignature::U1 => write!(f, "System.Byte"),
            TypeSignature::I2 => write!(f, "System.Int16"),
            TypeSignature::U2 => write!(f, "System.UInt16"),
            TypeSignature::I4 => write!(f, "System.Int32"),
            TypeSignature::U4 => write!(f, "System.UInt32"),
            TypeSignature::I8 => write!(f, "System.Int64"),
            TypeSignature::U8 => write!(f, "System.UInt64"),
            TypeSignature::R4 => write!(f, "System.Single"),
            TypeSignature::R8 => write!(f, "System.Double"),
            TypeSignature::String => write!(f, "System.String"),
            TypeSignature::Ptr(pointer) => write!(f, "{}*", pointer.base),
            TypeSignature::ByRef(inner) => write!(f, "{inner}&"),
            TypeSignature::ValueType(token) | TypeSignature::Class(token) => {
                write!(f, "{token}")
            }
            TypeSignature::GenericParamType(index) => write!(f, "!{index}"),
            TypeSignature::Array(array) => {
                write!(f, "{}[", array.base)?;
                for _ in 1..array.rank {
                    write!(f, ",")?;
                }
                write!(f, "]")
            }
            TypeSignature::GenericInst(base, args) => {
                write!(f, "{base}<")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            TypeSignature::TypedByRef => write!(f, "System.TypedReference"),
            TypeSignature::I => write!(f, "System.IntPtr"),
            TypeSignature::U => write!(f, "System.UIntPtr"),
            TypeSignature::FnPtr(_) => write!(f, "<fnptr>"),
            TypeSignature::Object => write!(f, "System.Object"),
            TypeSignature::SzArray(array) => write!(f, "{}[]", array.base),
            TypeSignature::GenericParamMethod(index) => write!(f, "!!{index}"),
            TypeSignature::ModifiedRequired(_) => write!(f, "<modreq>"),
            TypeSignature::ModifiedOptional(_) => write!(f, "<modopt>"),
            TypeSignature::Sentinel => write!(f, "<sentinel>"),
            TypeSignature::Pinned(inner) => write!(f, "{inner} pinned"),
        }
    }
}

/// A single custom modifier: required or optional, plus the modifier type
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureModifier {
    /// True for `CMOD_REQD`, false for `CMOD_OPT`.
    pub required: bool,
    /// `TypeDef`/`TypeRef`/`TypeSpec` token of the modifier type.
    pub modifier: Token,
}

/// One dimension of a multi-dimensional array shape.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArrayDimension {
    /// Declared size, if any.
    pub size: Option<u32>,
    /// Declared lower bound, if any.
    pub lower_bound: Option<u32>,
}

/// Shape of a multi-dimensional array: element type, rank and per-dimension
/// bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureArray {
    /// Element type.
    pub base: Box<TypeSignature>,
    /// Number of dimensions.
    pub rank: u32,
    /// Declared sizes and lower bounds, possibly fewer than `rank`.
    pub dimensions: Vec<ArrayDimension>,
}

/// Single-dimensional zero-based array with optional custom modifiers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureSzArray {
    /// Custom modifier tokens preceding the element type.
    pub modifiers: Vec<SignatureModifier>,
    /// Element type.
    pub base: Box<TypeSignature>,
}

/// Unmanaged pointer with optional custom modifiers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignaturePointer {
    /// Custom modifier tokens preceding the pointee type.
    pub modifiers: Vec<SignatureModifier>,
    /// Pointee type.
    pub base: Box<TypeSignature>,
}

/// One parameter (or return type) of a method or property signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureParameter {
    /// Custom modifier tokens.
    pub modifiers: Vec<SignatureModifier>,
    /// True if the parameter is passed by managed reference.
    pub by_ref: bool,
    /// Parameter type.
    pub base: TypeSignature,
}

/// A full method signature: calling convention, return type and parameters.
#[derive(Debug, Clone, PartialEq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SignatureMethod {
    /// Instance method (`HASTHIS`).
    pub has_this: bool,
    /// `this` is explicit in the parameter list (`EXPLICITTHIS`).
    pub explicit_this: bool,
    /// Default managed calling convention.
    pub default: bool,
    /// Variadic managed calling convention (`VARARG`).
    pub vararg: bool,
    /// Unmanaged `cdecl`.
    pub cdecl: bool,
    /// Unmanaged `stdcall`.
    pub stdcall: bool,
    /// Unmanaged `thiscall`.
    pub thiscall: bool,
    /// Unmanaged `fastcall`.
    pub fastcall: bool,
    /// Number of generic parameters (`GENERIC` convention).
    pub param_count_generic: u32,
    /// Declared parameter count, covering fixed and variadic parameters.
    pub param_count: u32,
    /// Return type.
    pub return_type: SignatureParameter,
    /// Fixed parameters.
    pub params: Vec<SignatureParameter>,
    /// Variadic parameters after the sentinel.
    pub varargs: Vec<SignatureParameter>,
}

/// A field signature: custom modifiers and the field type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureField {
    /// Custom modifier tokens.
    pub modifiers: Vec<SignatureModifier>,
    /// Field type.
    pub base: TypeSignature,
}

/// A property signature: instance flag, modifiers, property type and indexer
/// parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureProperty {
    /// True for instance properties.
    pub has_this: bool,
    /// Custom modifier tokens.
    pub modifiers: Vec<SignatureModifier>,
    /// Property type.
    pub base: TypeSignature,
    /// Indexer parameters.
    pub params: Vec<SignatureParameter>,
}
