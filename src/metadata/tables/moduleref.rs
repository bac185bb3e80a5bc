//! `ModuleRef` table (0x1A): references to external modules by name.

use crate::{
    file::io::{read_le_at_dyn, write_le_at_dyn},
    metadata::{
        tables::{RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `ModuleRef` table.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleRefRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x1Axxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// `#Strings` index of the module name.
    pub name: u32,
}

impl RowReadable for ModuleRefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(sizes.str_bytes())
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ModuleRefRaw {
            rid,
            token: Token::new(TableId::ModuleRef.token_base() | rid),
            offset: *offset,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

impl RowWritable for ModuleRefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <ModuleRefRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())
    }
}
