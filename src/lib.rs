//! # dotmeta
//!
//! Parsing, structural comparison and rebuilding of the metadata embedded in
//! managed (.NET / CLI) executables.
//!
//! The crate covers the metadata layer of ECMA-335: the fixed-width relational
//! tables of the `#~` stream, the `#Strings` / `#Blob` / `#GUID` / `#US` heaps
//! they index into, and the recursive binary signature encodings stored in the
//! blob heap. Locating the metadata root inside a PE image is *not* part of
//! this crate - callers hand in the raw heap and table byte ranges.
//!
//! ## Subsystems
//!
//! - [`metadata::streams`] - read-only views over the four shared heaps, plus
//!   append-only buffers for rebuilding them with stable offsets.
//! - [`metadata::tables`] - the row codec: per-table column layouts whose
//!   index widths are derived once per load from the [`metadata::tables::TableInfo`]
//!   size oracle, with positional read *and* write support.
//! - [`metadata::signatures`] - recursive decode/encode of type, method,
//!   field and property signatures, and of constant ("element") values tagged
//!   by their element type.
//! - [`metadata::comparer`] - structural equality over heterogeneous type and
//!   member representations (definitions, references, signatures), driven by
//!   an injected [`metadata::typesystem::TypeResolver`].
//!
//! ## Example
//!
//! ```rust
//! use dotmeta::metadata::signatures::{parse_field_signature, encode_field_signature};
//!
//! // FIELD prolog followed by ELEMENT_TYPE_I4
//! let blob = [0x06, 0x08];
//! let sig = parse_field_signature(&blob)?;
//! assert_eq!(encode_field_signature(&sig)?, blob);
//! # Ok::<(), dotmeta::Error>(())
//! ```

#![warn(missing_docs)]

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;
pub(crate) mod utils;

pub mod metadata;

pub use error::Error;
pub use file::parser::Parser;

/// Convenience `Result` used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
