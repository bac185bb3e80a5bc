//! The .NET metadata layer: heaps, tables, signatures and the type system.
//!
//! Submodules are layered bottom-up: [`token`] and [`streams`] are the raw
//! addressing and heap primitives, [`tables`] decodes and re-encodes the
//! fixed-width table rows, [`signatures`] handles the recursive blob formats,
//! [`typesystem`] holds the resolved entity model and [`comparer`] performs
//! structural equivalence over all of it.

pub mod comparer;
pub mod signatures;
pub mod streams;
pub mod tables;
pub mod token;
pub mod typesystem;
