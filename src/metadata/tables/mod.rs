//! Metadata table row codecs.
//!
//! The infrastructure half ([`TableInfo`], [`CodedIndex`], [`MetadataTable`],
//! the [`RowReadable`]/[`RowWritable`] traits and [`write_table`]) is shared
//! by every table; the rest of the module is one file per supported table
//! holding its raw row type. `Property` additionally carries an editable
//! façade ([`Property`]) for rebuild scenarios.
//!
//! # Reference
//! - [ECMA-335 Partition II, Section 22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod assembly;
mod assemblyref;
mod codedindex;
mod constant;
mod field;
mod memberref;
mod methoddef;
mod module;
mod moduleref;
mod property;
mod propertymap;
mod table;
mod tableid;
mod tableinfo;
mod typedef;
mod typeref;

pub use assembly::AssemblyRaw;
pub use assemblyref::AssemblyRefRaw;
pub use codedindex::{CodedIndex, CodedIndexType};
pub use constant::ConstantRaw;
pub use field::{FieldAttributes, FieldRaw};
pub use memberref::MemberRefRaw;
pub use methoddef::{MethodAttributes, MethodDefRaw};
pub use module::ModuleRaw;
pub use moduleref::ModuleRefRaw;
pub use property::{Property, PropertyAttributes, PropertyRaw};
pub use propertymap::PropertyMapRaw;
pub use table::{write_table, MetadataTable, RowReadable, RowWritable, TableIterator};
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo};
pub use typedef::{TypeAttributes, TypeDefRaw};
pub use typeref::TypeRefRaw;
