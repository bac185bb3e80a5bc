use crate::{
    file::io::{read_le_at, read_le_at_dyn, write_le_at, write_le_at_dyn},
    metadata::{
        tables::{RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `Property` table, with heap columns still as raw indices.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x17xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// `PropertyAttributes` bit mask.
    pub flags: u16,
    /// `#Strings` index of the property name.
    pub name: u32,
    /// `#Blob` index of the property signature.
    pub signature: u32,
}

impl RowReadable for PropertyRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */     2 +
            /* name */      sizes.str_bytes() +
            /* signature */ sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(PropertyRaw {
            rid,
            token: Token::new(TableId::Property.token_base() | rid),
            offset: *offset,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

impl RowWritable for PropertyRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <PropertyRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at::<u16>(data, offset, self.flags)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.signature, sizes.is_large_blob())?;
        Ok(())
    }
}
