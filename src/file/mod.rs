//! Low-level byte access for metadata parsing and generation.
//!
//! [`io`] holds the bounds-checked little-endian primitives, [`parser`] the
//! positional cursor built on top of them. Everything above this layer treats
//! [`parser::Parser`] as the only I/O primitive.

pub(crate) mod io;
pub(crate) mod parser;
