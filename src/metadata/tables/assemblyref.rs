//! `AssemblyRef` table (0x23): references to external assemblies.
//!
//! The `public_key_or_token` blob holds either a full public key or its
//! 8-byte token, selected by the `PUBLIC_KEY` flag.

use crate::{
    file::io::{read_le_at, read_le_at_dyn, write_le_at, write_le_at_dyn},
    metadata::{
        tables::{RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `AssemblyRef` table.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyRefRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x23xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// Major version.
    pub major_version: u16,
    /// Minor version.
    pub minor_version: u16,
    /// Build number.
    pub build_number: u16,
    /// Revision number.
    pub revision_number: u16,
    /// `AssemblyFlags` bit mask.
    pub flags: u32,
    /// `#Blob` index of the public key or its token; 0 for none.
    pub public_key_or_token: u32,
    /// `#Strings` index of the assembly name.
    pub name: u32,
    /// `#Strings` index of the culture; 0 for culture-neutral.
    pub culture: u32,
    /// `#Blob` index of the file hash; 0 for none.
    pub hash_value: u32,
}

impl RowReadable for AssemblyRefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* major_version */       2 +
            /* minor_version */       2 +
            /* build_number */        2 +
            /* revision_number */     2 +
            /* flags */               4 +
            /* public_key_or_token */ sizes.blob_bytes() +
            /* name */                sizes.str_bytes() +
            /* culture */             sizes.str_bytes() +
            /* hash_value */          sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyRefRaw {
            rid,
            token: Token::new(TableId::AssemblyRef.token_base() | rid),
            offset: *offset,
            major_version: read_le_at::<u16>(data, offset)?,
            minor_version: read_le_at::<u16>(data, offset)?,
            build_number: read_le_at::<u16>(data, offset)?,
            revision_number: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u32>(data, offset)?,
            public_key_or_token: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            hash_value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

impl RowWritable for AssemblyRefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <AssemblyRefRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at::<u16>(data, offset, self.major_version)?;
        write_le_at::<u16>(data, offset, self.minor_version)?;
        write_le_at::<u16>(data, offset, self.build_number)?;
        write_le_at::<u16>(data, offset, self.revision_number)?;
        write_le_at::<u32>(data, offset, self.flags)?;
        write_le_at_dyn(data, offset, self.public_key_or_token, sizes.is_large_blob())?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.culture, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.hash_value, sizes.is_large_blob())?;
        Ok(())
    }
}
