//! `TypeDef` table (0x02): types defined in the current module.
//!
//! `field_list` and `method_list` are the classic run-list columns: each is
//! the index of the first owned row in `Field`/`MethodDef`, and the run ends
//! where the next `TypeDef` row's list begins (or at the end of the member
//! table for the last type).

use bitflags::bitflags;

use crate::{
    file::io::{read_le_at, read_le_at_dyn, write_le_at, write_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

bitflags! {
    /// `TypeAttributes` flags for a `TypeDef` row (ECMA-335 II.23.1.15).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TypeAttributes: u32 {
        /// Visibility mask.
        const VISIBILITY_MASK = 0x0000_0007;
        /// The type is not exported.
        const NOT_PUBLIC = 0x0000_0000;
        /// The type is exported.
        const PUBLIC = 0x0000_0001;
        /// Class semantics mask.
        const CLASS_SEMANTICS_MASK = 0x0000_0020;
        /// The type is an interface.
        const INTERFACE = 0x0000_0020;
        /// The type is abstract.
        const ABSTRACT = 0x0000_0080;
        /// The type cannot be derived from.
        const SEALED = 0x0000_0100;
        /// The name is special, the exact meaning given by the name itself.
        const SPECIAL_NAME = 0x0000_0400;
    }
}

/// One row of the `TypeDef` table.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDefRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x02xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// `TypeAttributes` bit mask.
    pub flags: u32,
    /// `#Strings` index of the type name.
    pub name: u32,
    /// `#Strings` index of the type namespace.
    pub namespace: u32,
    /// `TypeDefOrRef` coded index of the base type; row 0 for no base.
    pub extends: CodedIndex,
    /// Index of the first owned row in the `Field` table.
    pub field_list: u32,
    /// Index of the first owned row in the `MethodDef` table.
    pub method_list: u32,
}

impl RowReadable for TypeDefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */       4 +
            /* name */        sizes.str_bytes() +
            /* namespace */   sizes.str_bytes() +
            /* extends */     sizes.coded_index_bytes(CodedIndexType::TypeDefOrRef) +
            /* field_list */  sizes.table_index_bytes(TableId::Field) +
            /* method_list */ sizes.table_index_bytes(TableId::MethodDef)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(TypeDefRaw {
            rid,
            token: Token::new(TableId::TypeDef.token_base() | rid),
            offset: *offset,
            flags: read_le_at::<u32>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            extends: CodedIndex::read(data, offset, sizes, CodedIndexType::TypeDefOrRef)?,
            field_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?,
            method_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}

impl RowWritable for TypeDefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <TypeDefRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at::<u32>(data, offset, self.flags)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.namespace, sizes.is_large_str())?;
        self.extends
            .write(data, offset, sizes, CodedIndexType::TypeDefOrRef)?;
        write_le_at_dyn(data, offset, self.field_list, sizes.is_large(TableId::Field))?;
        write_le_at_dyn(
            data,
            offset,
            self.method_list,
            sizes.is_large(TableId::MethodDef),
        )?;
        Ok(())
    }
}
