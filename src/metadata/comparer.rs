//! Structural equality across type and member representations.
//!
//! Definitions, references and signatures all describe types in different
//! encodings; [`SignatureComparer`] decides whether two of them describe the
//! *same* type or member. Token-bearing signature nodes are looked up through
//! the injected [`TypeResolver`]; a token that does not resolve makes the
//! comparison return `false`, never an error, so speculative matching over
//! incomplete type universes stays usable.
//!
//! Every `match_*` method is symmetric, and reflexive over semantically equal
//! inputs.

use std::sync::Arc;

use crate::metadata::{
    signatures::{
        SignatureField, SignatureMethod, SignatureModifier, SignatureParameter, SignatureProperty,
        TypeSignature,
    },
    token::Token,
    typesystem::{
        AssemblyIdentity, CilTypeRc, Member, MemberReference, MemberSignature, TypeResolver,
        TypeScope,
    },
};

/// Compares types, signatures and members for structural equality.
pub struct SignatureComparer<'a, R: TypeResolver> {
    resolver: &'a R,
}

impl<'a, R: TypeResolver> SignatureComparer<'a, R> {
    /// Create a comparer resolving tokens through `resolver`.
    pub fn new(resolver: &'a R) -> Self {
        SignatureComparer { resolver }
    }

    /// Compare two assembly identities: simple name, full version, culture
    /// and public key token all have to agree.
    #[must_use]
    pub fn match_assemblies(&self, a: &AssemblyIdentity, b: &AssemblyIdentity) -> bool {
        a.name == b.name
            && (a.major, a.minor, a.build, a.revision)
                == (b.major, b.minor, b.build, b.revision)
            && a.culture == b.culture
            && a.public_key_token == b.public_key_token
    }

    /// Compare two module scopes by file name.
    #[must_use]
    pub fn match_modules(&self, a: &str, b: &str) -> bool {
        a == b
    }

    /// Compare two resolved types: same name, same namespace, same scope.
    /// A definition and a reference to it compare equal; the same name in a
    /// different scope never does.
    #[must_use]
    pub fn match_types(&self, a: &CilTypeRc, b: &CilTypeRc) -> bool {
        if Arc::ptr_eq(a, b) {
            return true;
        }

        if a.name != b.name || a.namespace != b.namespace {
            return false;
        }

        match (&a.scope, &b.scope) {
            (TypeScope::Nested(outer_a), TypeScope::Nested(outer_b)) => {
                self.match_types(outer_a, outer_b)
            }
            (TypeScope::Assembly(id_a), TypeScope::Assembly(id_b)) => {
                self.match_assemblies(id_a, id_b)
            }
            (TypeScope::Module(name_a), TypeScope::Module(name_b)) => {
                self.match_modules(name_a, name_b)
            }
            _ => false,
        }
    }

    /// Compare a resolved type against a token-bearing type signature.
    #[must_use]
    pub fn match_type_to_signature(&self, a: &CilTypeRc, b: &TypeSignature) -> bool {
        match self.resolver.resolve(b) {
            Some(resolved) => self.match_types(a, &resolved),
            None => false,
        }
    }

    /// Compare two type signatures structurally: same shape, and recursively
    /// equal children in order.
    #[must_use]
    pub fn match_type_signatures(&self, a: &TypeSignature, b: &TypeSignature) -> bool {
        match (a, b) {
            (TypeSignature::Void, TypeSignature::Void)
            | (TypeSignature::Boolean, TypeSignature::Boolean)
            | (TypeSignature::Char, TypeSignature::Char)
            | (TypeSignature::I1, TypeSignature::I1)
            | (TypeSignature::U1, TypeSignature::U1)
            | (TypeSignature::I2, TypeSignature::I2)
            | (TypeSignature::U2, TypeSignature::U2)
            | (TypeSignature::I4, TypeSignature::I4)
            | (TypeSignature::U4, TypeSignature::U4)
            | (TypeSignature::I8, TypeSignature::I8)
            | (TypeSignature::U8, TypeSignature::U8)
            | (TypeSignature::R4, TypeSignature::R4)
            | (TypeSignature::R8, TypeSignature::R8)
            | (TypeSignature::String, TypeSignature::String)
            | (TypeSignature::Object, TypeSignature::Object)
            | (TypeSignature::TypedByRef, TypeSignature::TypedByRef)
            | (TypeSignature::I, TypeSignature::I)
            | (TypeSignature::U, TypeSignature::U)
            | (TypeSignature::Sentinel, TypeSignature::Sentinel) => true,

            (TypeSignature::Class(token_a), TypeSignature::Class(token_b))
            | (TypeSignature::ValueType(token_a), TypeSignature::ValueType(token_b)) => {
                self.match_tokens(a, *token_a, b, *token_b)
            }

            (TypeSignature::Ptr(ptr_a), TypeSignature::Ptr(ptr_b)) => {
                self.match_modifiers(&ptr_a.modifiers, &ptr_b.modifiers)
                    && self.match_type_signatures(&ptr_a.base, &ptr_b.base)
            }
            (TypeSignature::ByRef(inner_a), TypeSignature::ByRef(inner_b))
            | (TypeSignature::Pinned(inner_a), TypeSignature::Pinned(inner_b)) => {
                self.match_type_signatures(inner_a, inner_b)
            }

            (
                TypeSignature::GenericParamType(index_a),
                TypeSignature::GenericParamType(index_b),
            )
            | (
                TypeSignature::GenericParamMethod(index_a),
                TypeSignature::GenericParamMethod(index_b),
            ) => index_a == index_b,

            (TypeSignature::Array(array_a), TypeSignature::Array(array_b)) => {
                array_a.rank == array_b.rank
                    && array_a.dimensions == array_b.dimensions
                    && self.match_type_signatures(&array_a.base, &array_b.base)
            }
            (TypeSignature::SzArray(array_a), TypeSignature::SzArray(array_b)) => {
                self.match_modifiers(&array_a.modifiers, &array_b.modifiers)
                    && self.match_type_signatures(&array_a.base, &array_b.base)
            }

            (
                TypeSignature::GenericInst(base_a, args_a),
                TypeSignature::GenericInst(base_b, args_b),
            ) => {
                args_a.len() == args_b.len()
                    && self.match_type_signatures(base_a, base_b)
                    && args_a
                        .iter()
                        .zip(args_b)
                        .all(|(arg_a, arg_b)| self.match_type_signatures(arg_a, arg_b))
            }

            (TypeSignature::FnPtr(method_a), TypeSignature::FnPtr(method_b)) => {
                self.match_method_signatures(method_a, method_b)
            }

            (
                TypeSignature::ModifiedRequired(tokens_a),
                TypeSignature::ModifiedRequired(tokens_b),
            )
            | (
                TypeSignature::ModifiedOptional(tokens_a),
                TypeSignature::ModifiedOptional(tokens_b),
            ) => {
                tokens_a.len() == tokens_b.len()
                    && tokens_a.iter().zip(tokens_b).all(|(token_a, token_b)| {
                        self.match_tokens(
                            &TypeSignature::Class(*token_a),
                            *token_a,
                            &TypeSignature::Class(*token_b),
                            *token_b,
                        )
                    })
            }

            _ => false,
        }
    }

    /// Compare two method signatures: calling-convention flags, generic
    /// arity, return type, and every parameter in order.
    #[must_use]
    pub fn match_method_signatures(&self, a: &SignatureMethod, b: &SignatureMethod) -> bool {
        if a.has_this != b.has_this
            || a.explicit_this != b.explicit_this
            || a.vararg != b.vararg
            || a.cdecl != b.cdecl
            || a.stdcall != b.stdcall
            || a.thiscall != b.thiscall
            || a.fastcall != b.fastcall
            || a.param_count_generic != b.param_count_generic
        {
            return false;
        }

        if a.params.len() != b.params.len() || a.varargs.len() != b.varargs.len() {
            return false;
        }

        self.match_parameters(&a.return_type, &b.return_type)
            && a.params
                .iter()
                .zip(&b.params)
                .all(|(param_a, param_b)| self.match_parameters(param_a, param_b))
            && a.varargs
                .iter()
                .zip(&b.varargs)
                .all(|(param_a, param_b)| self.match_parameters(param_a, param_b))
    }

    /// Compare two field signatures.
    #[must_use]
    pub fn match_field_signatures(&self, a: &SignatureField, b: &SignatureField) -> bool {
        self.match_modifiers(&a.modifiers, &b.modifiers)
            && self.match_type_signatures(&a.base, &b.base)
    }

    /// Compare two property signatures.
    #[must_use]
    pub fn match_property_signatures(&self, a: &SignatureProperty, b: &SignatureProperty) -> bool {
        a.has_this == b.has_this
            && a.params.len() == b.params.len()
            && self.match_modifiers(&a.modifiers, &b.modifiers)
            && self.match_type_signatures(&a.base, &b.base)
            && a.params
                .iter()
                .zip(&b.params)
                .all(|(param_a, param_b)| self.match_parameters(param_a, param_b))
    }

    /// Compare two member signatures; a field never matches a method.
    #[must_use]
    pub fn match_member_signatures(&self, a: &MemberSignature, b: &MemberSignature) -> bool {
        match (a, b) {
            (MemberSignature::Field(field_a), MemberSignature::Field(field_b)) => {
                self.match_field_signatures(field_a, field_b)
            }
            (MemberSignature::Method(method_a), MemberSignature::Method(method_b)) => {
                self.match_method_signatures(method_a, method_b)
            }
            _ => false,
        }
    }

    /// Compare two member references: declaring type, name and signature.
    #[must_use]
    pub fn match_member_references(&self, a: &MemberReference, b: &MemberReference) -> bool {
        a.name == b.name
            && self.match_types(&a.parent, &b.parent)
            && self.match_member_signatures(&a.signature, &b.signature)
    }

    /// Compare two members, definition or reference: declaring type, name and
    /// signature, symmetric across the definition/reference divide.
    #[must_use]
    pub fn match_members(&self, a: &Member, b: &Member) -> bool {
        match (a, b) {
            (Member::FieldDef(type_a, field_a), Member::FieldDef(type_b, field_b)) => {
                field_a.name == field_b.name
                    && self.match_types(type_a, type_b)
                    && self.match_field_signatures(&field_a.signature, &field_b.signature)
            }
            (Member::MethodDef(type_a, method_a), Member::MethodDef(type_b, method_b)) => {
                method_a.name == method_b.name
                    && self.match_types(type_a, type_b)
                    && self.match_method_signatures(&method_a.signature, &method_b.signature)
            }
            (Member::Reference(ref_a), Member::Reference(ref_b)) => {
                self.match_member_references(ref_a, ref_b)
            }
            (Member::FieldDef(ty, field), Member::Reference(reference))
            | (Member::Reference(reference), Member::FieldDef(ty, field)) => {
                let MemberSignature::Field(ref_signature) = &reference.signature else {
                    return false;
                };
                field.name == reference.name
                    && self.match_types(ty, &reference.parent)
                    && self.match_field_signatures(&field.signature, ref_signature)
            }
            (Member::MethodDef(ty, method), Member::Reference(reference))
            | (Member::Reference(reference), Member::MethodDef(ty, method)) => {
                let MemberSignature::Method(ref_signature) = &reference.signature else {
                    return false;
                };
                method.name == reference.name
                    && self.match_types(ty, &reference.parent)
                    && self.match_method_signatures(&method.signature, ref_signature)
            }
            _ => false,
        }
    }

    fn match_parameters(&self, a: &SignatureParameter, b: &SignatureParameter) -> bool {
        a.by_ref == b.by_ref
            && self.match_modifiers(&a.modifiers, &b.modifiers)
            && self.match_type_signatures(&a.base, &b.base)
    }

    fn match_modifiers(&self, a: &[SignatureModifier], b: &[SignatureModifier]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(mod_a, mod_b)| {
                mod_a.required == mod_b.required
                    && self.match_tokens(
                        &TypeSignature::Class(mod_a.modifier),
                        mod_a.modifier,
                        &TypeSignature::Class(mod_b.modifier),
                        mod_b.modifier,
                    )
            })
    }

    /// Two tokens denote the same type if they are literally equal, or if
    /// both resolve and the resolved types match.
    fn match_tokens(
        &self,
        signature_a: &TypeSignature,
        token_a: Token,
        signature_b: &TypeSignature,
        token_b: Token,
    ) -> bool {
        if token_a == token_b {
            return true;
        }

        match (
            self.resolver.resolve(signature_a),
            self.resolver.resolve(signature_b),
        ) {
            (Some(type_a), Some(type_b)) => self.match_types(&type_a, &type_b),
            _ => false,
        }
    }
}
