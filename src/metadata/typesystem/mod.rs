//! Resolved type system: entities, naming and the type registry.
//!
//! The codec layers traffic in tokens and blobs; this module is where those
//! become typed entities. [`CilType`] unifies definitions and references,
//! [`TypeRegistry`] indexes them by token, and the [`TypeResolver`] trait is
//! the seam through which decoding and comparison look tokens up without
//! owning a registry themselves.

mod names;
mod registry;
mod types;

pub use names::{AssemblyIdentity, TypeName};
pub use registry::{TypeRegistry, TypeResolver};
pub use types::{
    CilType, CilTypeRc, Field, FieldList, Member, MemberReference, MemberSignature, Method,
    MethodList, TypeScope,
};
