//! Resolved type and member entities.

use std::sync::Arc;

use crate::metadata::{
    signatures::{SignatureField, SignatureMethod, TypeSignature},
    tables::{FieldAttributes, MethodAttributes},
    token::Token,
    typesystem::AssemblyIdentity,
};

/// Reference-counted handle to a [`CilType`].
pub type CilTypeRc = Arc<CilType>;
/// Shared, append-only list of fields.
pub type FieldList = Arc<boxcar::Vec<Arc<Field>>>;
/// Shared, append-only list of methods.
pub type MethodList = Arc<boxcar::Vec<Arc<Method>>>;

/// Where a type lives: its resolution scope.
#[derive(Debug, Clone)]
pub enum TypeScope {
    /// Declared in (or referencing into) an assembly with this identity.
    Assembly(Arc<AssemblyIdentity>),
    /// Declared in a module, identified by file name.
    Module(String),
    /// Nested inside another type.
    Nested(CilTypeRc),
}

/// A resolved type: definitions and references share this shape, a reference
/// simply carries no token and no members.
#[derive(Debug)]
pub struct CilType {
    /// Metadata token; `None` for synthetic references built in memory.
    pub token: Option<Token>,
    /// Resolution scope.
    pub scope: TypeScope,
    /// Namespace; empty for the global namespace and for nested types.
    pub namespace: String,
    /// Simple name.
    pub name: String,
    /// Base type (`extends`), if any.
    pub base: Option<CilTypeRc>,
    /// True for value types (including enums).
    pub is_value_type: bool,
    /// Declared fields, in row order.
    pub fields: FieldList,
    /// Declared methods, in row order.
    pub methods: MethodList,
}

impl CilType {
    /// Create a type with empty member lists.
    #[must_use]
    pub fn new(
        token: Option<Token>,
        scope: TypeScope,
        namespace: &str,
        name: &str,
        base: Option<CilTypeRc>,
        is_value_type: bool,
    ) -> Self {
        CilType {
            token,
            scope,
            namespace: namespace.to_string(),
            name: name.to_string(),
            base,
            is_value_type,
            fields: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Full name including the declaring-type chain, e.g. `NS.Outer+Inner`.
    #[must_use]
    pub fn full_name(&self) -> String {
        if let TypeScope::Nested(declaring) = &self.scope {
            return format!("{}+{}", declaring.full_name(), self.name);
        }

        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// True if this type derives directly from `System.Enum`.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.base
            .as_ref()
            .is_some_and(|base| base.namespace == "System" && base.name == "Enum")
    }

    /// The underlying primitive of an enum: the type of its first instance
    /// field (the `value__` field per II.14.3). `None` if there is none.
    #[must_use]
    pub fn enum_underlying_type(&self) -> Option<TypeSignature> {
        self.fields
            .iter()
            .map(|(_, field)| field)
            .find(|field| !field.flags.contains(FieldAttributes::STATIC))
            .map(|field| field.signature.base.clone())
    }
}

/// A field definition owned by its declaring type.
#[derive(Debug)]
pub struct Field {
    /// Field attributes.
    pub flags: FieldAttributes,
    /// Field name.
    pub name: String,
    /// Parsed field signature.
    pub signature: SignatureField,
}

/// A method definition owned by its declaring type.
#[derive(Debug)]
pub struct Method {
    /// Method attributes.
    pub flags: MethodAttributes,
    /// Method name.
    pub name: String,
    /// Parsed method signature.
    pub signature: SignatureMethod,
}

/// The signature of a member reference: a field or a method blob.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberSignature {
    /// Field reference signature.
    Field(SignatureField),
    /// Method reference signature.
    Method(SignatureMethod),
}

/// A reference to a member of some (possibly external) type.
#[derive(Debug)]
pub struct MemberReference {
    /// The type declaring the referenced member.
    pub parent: CilTypeRc,
    /// Member name.
    pub name: String,
    /// Referenced signature.
    pub signature: MemberSignature,
}

/// A member as seen by the comparer: a definition together with its declaring
/// type, or a reference.
#[derive(Debug, Clone)]
pub enum Member {
    /// Field definition and its declaring type.
    FieldDef(CilTypeRc, Arc<Field>),
    /// Method definition and its declaring type.
    MethodDef(CilTypeRc, Arc<Method>),
    /// Member reference.
    Reference(Arc<MemberReference>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembly_scope(name: &str) -> TypeScope {
        TypeScope::Assembly(Arc::new(AssemblyIdentity::new(name, 1, 0, 0, 0)))
    }

    #[test]
    fn full_names() {
        let outer = Arc::new(CilType::new(
            None,
            assembly_scope("Lib"),
            "NS",
            "Outer",
            None,
            false,
        ));
        let inner = CilType::new(
            None,
            TypeScope::Nested(outer.clone()),
            "",
            "Inner",
            None,
            false,
        );

        assert_eq!(outer.full_name(), "NS.Outer");
        assert_eq!(inner.full_name(), "NS.Outer+Inner");
    }

    #[test]
    fn enum_detection() {
        let system_enum = Arc::new(CilType::new(
            None,
            assembly_scope("mscorlib"),
            "System",
            "Enum",
            None,
            false,
        ));

        let color = CilType::new(
            None,
            assembly_scope("Lib"),
            "NS",
            "Color",
            Some(system_enum),
            true,
        );
        color.fields.push(Arc::new(Field {
            flags: FieldAttributes::RT_SPECIAL_NAME,
            name: "value__".to_string(),
            signature: SignatureField {
                modifiers: Vec::new(),
                base: TypeSignature::I2,
            },
        }));
        color.fields.push(Arc::new(Field {
            flags: FieldAttributes::STATIC | FieldAttributes::LITERAL,
            name: "Red".to_string(),
            signature: SignatureField {
                modifiers: Vec::new(),
                base: TypeSignature::ValueType(Token::new(0x0200_0001)),
            },
        }));

        assert!(color.is_enum());
        assert_eq!(color.enum_underlying_type(), Some(TypeSignature::I2));

        let plain = CilType::new(None, assembly_scope("Lib"), "NS", "Plain", None, false);
        assert!(!plain.is_enum());
        assert_eq!(plain.enum_underlying_type(), None);
    }
}
