//! `Property` table (0x17): property definitions and their editable façade.
//!
//! [`PropertyRaw`] is the fixed-width row codec; [`Property`] layers lazy
//! heap resolution, cached derived state and rebuild support on top of it.

mod owned;
mod raw;

use bitflags::bitflags;

pub use owned::Property;
pub use raw::PropertyRaw;

bitflags! {
    /// `PropertyAttributes` flags for a `Property` row (ECMA-335 II.23.1.14).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PropertyAttributes: u16 {
        /// The name is special, the exact meaning given by the name itself.
        const SPECIAL_NAME = 0x0200;
        /// The runtime should check the name encoding.
        const RT_SPECIAL_NAME = 0x0400;
        /// The property has a default value in the `Constant` table.
        const HAS_DEFAULT = 0x1000;
    }
}
