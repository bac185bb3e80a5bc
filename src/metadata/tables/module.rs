//! `Module` table (0x00): the identity of the current module.
//!
//! Exactly one row per module, carrying the module name, the MVID and the
//! edit-and-continue generation columns (which are reserved and almost always
//! zero).

use crate::{
    file::io::{read_le_at, read_le_at_dyn, write_le_at, write_le_at_dyn},
    metadata::{
        tables::{RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `Module` table, with heap columns still as raw indices.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x00xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// Generation number (reserved, zero).
    pub generation: u16,
    /// `#Strings` index of the module name.
    pub name: u32,
    /// `#GUID` index of the module version identifier.
    pub mvid: u32,
    /// `#GUID` index of the edit-and-continue identifier (reserved).
    pub encid: u32,
    /// `#GUID` index of the edit-and-continue base identifier (reserved).
    pub encbaseid: u32,
}

impl RowReadable for ModuleRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* generation */ 2 +
            /* name */       sizes.str_bytes() +
            /* mvid */       sizes.guid_bytes() +
            /* encid */      sizes.guid_bytes() +
            /* encbaseid */  sizes.guid_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ModuleRaw {
            rid,
            token: Token::new(TableId::Module.token_base() | rid),
            offset: *offset,
            generation: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            mvid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            encid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
            encbaseid: read_le_at_dyn(data, offset, sizes.is_large_guid())?,
        })
    }
}

impl RowWritable for ModuleRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <ModuleRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at::<u16>(data, offset, self.generation)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.mvid, sizes.is_large_guid())?;
        write_le_at_dyn(data, offset, self.encid, sizes.is_large_guid())?;
        write_le_at_dyn(data, offset, self.encbaseid, sizes.is_large_guid())?;
        Ok(())
    }
}
