//! `MemberRef` table (0x0A): references to fields and methods of other types.
//!
//! Whether a row names a field or a method is not stored in the row itself;
//! it follows from the first byte of the signature blob.

use crate::{
    file::io::{read_le_at_dyn, write_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `MemberRef` table.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberRefRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x0Axxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// `MemberRefParent` coded index: the type or module declaring the member.
    pub class: CodedIndex,
    /// `#Strings` index of the member name.
    pub name: u32,
    /// `#Blob` index of the member signature.
    pub signature: u32,
}

impl RowReadable for MemberRefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* class */     sizes.coded_index_bytes(CodedIndexType::MemberRefParent) +
            /* name */      sizes.str_bytes() +
            /* signature */ sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MemberRefRaw {
            rid,
            token: Token::new(TableId::MemberRef.token_base() | rid),
            offset: *offset,
            class: CodedIndex::read(data, offset, sizes, CodedIndexType::MemberRefParent)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

impl RowWritable for MemberRefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <MemberRefRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        self.class
            .write(data, offset, sizes, CodedIndexType::MemberRefParent)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.signature, sizes.is_large_blob())?;
        Ok(())
    }
}
