//! `Field` table (0x04): field definitions, owned by `TypeDef` run lists.

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
    /// `FieldAttributes` flags for a `Field` row (ECMA-335 II.23.1.5).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FieldAttributes: u16 {
        /// Accessibility mask.
        const FIELD_ACCESS_MASK = 0x0007;
        /// Accessible to everyone.
        const PUBLIC = 0x0006;
        /// The field is per-type rather than per-instance.
        const STATIC = 0x0010;
        /// The field may only be initialized, not written after init.
        const INIT_ONLY = 0x0020;
        /// The field value is a compile-time constant.
        const LITERAL = 0x0040;
        /// The field is special; its name describes how.
        const SPECIAL_NAME = 0x0200;
        /// The runtime gives the field special treatment (e.g. `value__`).
        const RT_SPECIAL_NAME = 0x0400;
        /// The field has a default value in the `Constant` table.
        const HAS_DEFAULT = 0x8000;
    }
}

/// One row of the `Field` table.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x04xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// `FieldAttributes` bit mask.
    pub flags: u16,
    /// `#Strings` index of the field name.
    pub name: u32,
    /// `#Blob` index of the field signature.
    pub signature: u32,
}

impl RowReadable for FieldRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* flags */     2 +
            /* name */      sizes.str_bytes() +
            /* signature */ sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FieldRaw {
            rid,
            token: Token::new(TableId::Field.token_base() | rid),
            offset: *offset,
            flags: read_le_at::<u16>(data, offset)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            signature: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

impl RowWritable for FieldRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <FieldRaw as RowReadable>::row_size(sizes)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{write_table, MetadataTable, TableInfo};
    use std::sync::Arc;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x16, 0x80, // flags
            0x02, 0x02, // name
            0x03, 0x03, // signature
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Field, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<FieldRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x0400_0001);
        let flags = FieldAttributes::from_bits_truncate(row.flags);
        assert!(flags.contains(FieldAttributes::STATIC));
        assert!(flags.contains(FieldAttributes::HAS_DEFAULT));
        assert_eq!(row.name, 0x0202);
        assert_eq!(row.signature, 0x0303);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x01, 0x01, // flags
            0x02, 0x02, 0x02, 0x02, // name
            0x03, 0x03, 0x03, 0x03, // signature
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Field, 1)],
            true,
            true,
            false,
        ));
        let table = MetadataTable::<FieldRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.name, 0x0202_0202);
        assert_eq!(row.signature, 0x0303_0303);
    }

    #[test]
    fn write_round_trip() {
        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Field, 1)],
            false,
            false,
            false,
        ));

        let row = FieldRaw {
            rid: 1,
            token: Token::new(0x0400_0001),
            offset: 0,
            flags: FieldAttributes::PUBLIC.bits(),
            name: 0x30,
            signature: 0x40,
        };

        let data = write_table(std::slice::from_ref(&row), &sizes).unwrap();
        let table = MetadataTable::<FieldRaw>::new(&data, 1, sizes).unwrap();
        assert_eq!(table.get(1).unwrap(), row);
    }
}
