//! Token-indexed type registry and the resolution seam.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use dashmap::DashMap;

use crate::metadata::{
    signatures::TypeSignature,
    token::Token,
    typesystem::{CilType, CilTypeRc, TypeName},
};

/// Table byte used for tokens handed out to synthetic in-memory types, well
/// clear of the real metadata table range.
const SYNTHETIC_TABLE: u32 = 0xF0;

/// Resolution of signature type references to concrete types.
///
/// Injected wherever decoding or comparison needs to look through a
/// `Class`/`ValueType` token; callers decide what universe of types is
/// visible.
pub trait TypeResolver: Send + Sync {
    /// Resolve a `Class` or `ValueType` signature to its type. `None` for
    /// signatures that carry no token or tokens this resolver does not know.
    fn resolve(&self, signature: &TypeSignature) -> Option<CilTypeRc>;

    /// Resolve a structured type name, ignoring its assembly qualifier.
    /// `None` when no registered type carries that full name.
    fn resolve_name(&self, name: &TypeName) -> Option<CilTypeRc>;
}

/// Concurrent registry of all known types, keyed by token.
///
/// Types without a token get a synthetic one on registration, so every
/// registered type is addressable.
pub struct TypeRegistry {
    types: DashMap<Token, CilTypeRc>,
    next_synthetic: AtomicU32,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        TypeRegistry {
            types: DashMap::new(),
            next_synthetic: AtomicU32::new(1),
        }
    }

    /// Register a type. A type without a token is assigned a fresh synthetic
    /// one. Returns the shared handle.
    pub fn register(&self, mut entry: CilType) -> CilTypeRc {
        let token = match entry.token {
            Some(token) => token,
            None => {
                let rid = self.next_synthetic.fetch_add(1, Ordering::Relaxed);
                let token = Token::new((SYNTHETIC_TABLE << 24) | rid);
                entry.token = Some(token);
                token
            }
        };

        let shared = Arc::new(entry);
        self.types.insert(token, shared.clone());
        shared
    }

    /// Look up a type by token.
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<CilTypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a type by its full name (`NS.Name` or `NS.Outer+Inner`). The
    /// first match wins when several scopes declare the same name.
    #[must_use]
    pub fn get_by_fullname(&self, full_name: &str) -> Option<CilTypeRc> {
        self.types
            .iter()
            .find(|entry| entry.value().full_name() == full_name)
            .map(|entry| entry.value().clone())
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, signature: &TypeSignature) -> Option<CilTypeRc> {
        match signature {
            TypeSignature::Class(token) | TypeSignature::ValueType(token) => self.get(token),
            _ => None,
        }
    }

    fn resolve_name(&self, name: &TypeName) -> Option<CilTypeRc> {
        self.get_by_fullname(&name.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{AssemblyIdentity, TypeScope};

    fn sample_type(token: Option<Token>, namespace: &str, name: &str) -> CilType {
        CilType::new(
            token,
            TypeScope::Assembly(Arc::new(AssemblyIdentity::new("Lib", 1, 0, 0, 0))),
            namespace,
            name,
            None,
            false,
        )
    }

    #[test]
    fn register_and_resolve() {
        let registry = TypeRegistry::new();
        let token = Token::new(0x0200_0001);
        let registered = registry.register(sample_type(Some(token), "NS", "SomeType"));

        let resolved = registry.resolve(&TypeSignature::Class(token)).unwrap();
        assert!(Arc::ptr_eq(&registered, &resolved));

        assert!(registry
            .resolve(&TypeSignature::Class(Token::new(0x0200_0099)))
            .is_none());
        assert!(registry.resolve(&TypeSignature::I4).is_none());
    }

    #[test]
    fn synthetic_tokens_are_distinct() {
        let registry = TypeRegistry::new();
        let first = registry.register(sample_type(None, "NS", "A"));
        let second = registry.register(sample_type(None, "NS", "B"));

        let first_token = first.token.unwrap();
        let second_token = second.token.unwrap();
        assert_ne!(first_token, second_token);
        assert_eq!(first_token.table(), 0xF0);
        assert!(registry.get(&first_token).is_some());
    }

    #[test]
    fn name_lookup() {
        let registry = TypeRegistry::new();
        registry.register(sample_type(Some(Token::new(0x0200_0001)), "NS", "SomeType"));

        let name = TypeName::parse("NS.SomeType, Lib, Version=1.0.0.0").unwrap();
        assert!(registry.resolve_name(&name).is_some());

        let missing = TypeName::parse("NS.Missing").unwrap();
        assert!(registry.resolve_name(&missing).is_none());
    }
}
