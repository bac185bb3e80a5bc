//! The four shared metadata heaps and their rebuild buffers.
//!
//! Heaps are append-only byte areas addressed by byte offset. The read side
//! ([`Strings`], [`Blob`], [`Guid`], [`UserStrings`]) gives zero-copy,
//! side-effect-free access into loaded heap data; the write side
//! ([`StringsBuffer`], [`BlobBuffer`], [`GuidBuffer`], [`UserStringsBuffer`])
//! builds new heap images with stable, deduplicated offsets for a rebuild
//! pass. Offset 0 is reserved on the String and Blob heaps and denotes the
//! empty string / null blob.
//!
//! # Reference
//! - [ECMA-335 II.24.2.3 - II.24.2.6](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod blob;
mod buffers;
mod guid;
mod strings;
mod userstrings;

pub use blob::Blob;
pub use buffers::{BlobBuffer, GuidBuffer, StringsBuffer, UserStringsBuffer};
pub use guid::Guid;
pub use strings::Strings;
pub use userstrings::UserStrings;
