//! `MethodDef` table (0x06): method definitions, owned by `TypeDef` run lists.

use bitflags::bitflags;

use crate::{
    file::io::{read_le_at, read_le_at_dyn, write_le_at, write_le_at_dyn},
    metadata::{
        tables::{RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

bitflags! {
    /// `MethodAttributes` flags for a `MethodDef` row (ECMA-335 II.23.1.10).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MethodAttributes: u16 {
        /// Accessibility mask.
        const MEMBER_ACCESS_MASK = 0x0007;
        /// Accessible to everyone.
        const PUBLIC = 0x0006;
        /// The method is per-type rather than per-instance.
        const STATIC = 0x0010;
        /// The method cannot be overridden.
        const FINAL = 0x0020;
        /// The method is virtual.
        const VIRTUAL = 0x0040;
        /// The method hides by name and signature.
        const HIDE_BY_SIG = 0x0080;
        /// The name is special, the exact meaning given by the name itself.
        const SPECIAL_NAME = 0x0800;
        /// The method is abstract.
        const ABSTRACT = 0x0400;
    }
}

/// One row of the `MethodDef` table.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDefRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x06xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// Relative virtual address of the method body; 0 for abstract methods.
    pub rva: u32,
    /// `MethodImplAttributes` bit mask.
    pub impl_flags: u16,
    /// `MethodAttributes` bit mask.
    pub flags: u16,
    /// `#Strings` index of the method name.
    pub name: u32,
    /// `#Blob` index of the method signature.
    pub signature: u32,
    /// Index of the first owned row in the `Param` table.
    pub param_list: u32,
}

impl RowReadable for MethodDefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* rva */        4 +
            /* impl_flags */ 2 +
            /* flags */      2 +
            /* name */       sizes.str_bytes() +
            /* signature */  sizes.blob_bytes() +
            /* param_list */ sizes.table_index_bytes(TableId::Param)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodDefRaw {
            rid,
            token: Token::new(TableId::MethodDef.token_base() | rid),
            offset: *offset,
            rva: read_le_at::<u32>(data, offset)?,
            impl_flags: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            param_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Param))?,
        })
    }
}

impl RowWritable for MethodDefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <MethodDefRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at::<u32>(data, offset, self.rva)?;
        write_le_at::<u16>(data, offset, self.impl_flags)?;
        write_le_at::<u16>(data, offset, self.flags)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.signature, sizes.is_large_blob())?;
        write_le_at_dyn(data, offset, self.param_list, sizes.is_large(TableId::Param))?;
        Ok(())
    }
}
