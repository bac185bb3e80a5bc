//! `PropertyMap` table (0x15): maps a `TypeDef` to its run of `Property`
//! rows.
//!
//! `property_list` is the index of the first owned `Property` row; the run
//! extends to the next map row's list (or to the end of the `Property`
//! table).

use crate::{
    file::io::{read_le_at_dyn, write_le_at_dyn},
    metadata::{
        tables::{RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `PropertyMap` table.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyMapRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x15xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// Index of the owning `TypeDef` row.
    pub parent: u32,
    /// Index of the first owned row in the `Property` table.
    pub property_list: u32,
}

impl PropertyMapRaw {
    /// True if the 1-based `Property` row `index` falls inside this map's
    /// run, given the list start of the following map row (or
    /// `property_count + 1` for the last row).
    #[must_use]
    pub fn contains_property(&self, index: u32, next_list: u32) -> bool {
        index >= self.property_list && index < next_list
    }
}

impl RowReadable for PropertyMapRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* parent */        sizes.table_index_bytes(TableId::TypeDef) +
            /* property_list */ sizes.table_index_bytes(TableId::Property)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(PropertyMapRaw {
            rid,
            token: Token::new(TableId::PropertyMap.token_base() | rid),
            offset: *offset,
            parent: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
            property_list: read_le_at_dyn(data, offset, sizes.is_large(TableId::Property))?,
        })
    }
}

impl RowWritable for PropertyMapRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <PropertyMapRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at_dyn(data, offset, self.parent, sizes.is_large(TableId::TypeDef))?;
        write_le_at_dyn(
            data,
            offset,
            self.property_list,
            sizes.is_large(TableId::Property),
        )?;
        Ok(())
    }
}
