//! `Assembly` table (0x20): the identity of the current assembly.
//!
//! At most one row, carrying the four-part version, culture, public key and
//! hash algorithm.

use crate::{
    file::io::{read_le_at, read_le_at_dyn, write_le_at, write_le_at_dyn},
    metadata::{
        tables::{RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `Assembly` table.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x20xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// `AssemblyHashAlgorithm` identifier.
    pub hash_alg_id: u32,
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
    /// `#Blob` index of the public key; 0 if unsigned.
    pub public_key: u32,
    /// `#Strings` index of the assembly name.
    pub name: u32,
    /// `#Strings` index of the culture; 0 for culture-neutral.
    pub culture: u32,
}

impl RowReadable for AssemblyRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* hash_alg_id */     4 +
            /* major_version */   2 +
            /* minor_version */   2 +
            /* build_number */    2 +
            /* revision_number */ 2 +
            /* flags */           4 +
            /* public_key */      sizes.blob_bytes() +
            /* name */            sizes.str_bytes() +
            /* culture */         sizes.str_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyRaw {
            rid,
            token: Token::new(TableId::Assembly.token_base() | rid),
            offset: *offset,
            hash_alg_id: read_le_at::<u32>(data, offset)?,
            major_version: read_le_at::<u16>(data, offset)?,
            minor_version: read_le_at::<u16>(data, offset)?,
            build_number: read_le_at::<u16>(data, offset)?,
            revision_number: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u32>(data, offset)?,
            public_key: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

impl RowWritable for AssemblyRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <AssemblyRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at::<u32>(data, offset, self.hash_alg_id)?;
        write_le_at::<u16>(data, offset, self.major_version)?;
        write_le_at::<u16>(data, offset, self.minor_version)?;
        write_le_at::<u16>(data, offset, self.build_number)?;
        write_le_at::<u16>(data, offset, self.revision_number)?;
        write_le_at::<u32>(data, offset, self.flags)?;
        write_le_at_dyn(data, offset, self.public_key, sizes.is_large_blob())?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.culture, sizes.is_large_str())?;
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
            0x04, 0x80, 0x00, 0x00, // hash_alg_id (SHA1)
            0x01, 0x00, // major_version
            0x03, 0x00, // minor_version
            0x03, 0x00, // build_number
            0x07, 0x00, // revision_number
            0x00, 0x00, 0x00, 0x00, // flags
            0x02, 0x02, // public_key
            0x03, 0x03, // name
            0x04, 0x04, // culture
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Assembly, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<AssemblyRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x2000_0001);
        assert_eq!(row.hash_alg_id, 0x8004);
        assert_eq!(row.major_version, 1);
        assert_eq!(row.minor_version, 3);
        assert_eq!(row.build_number, 3);
        assert_eq!(row.revision_number, 7);
        assert_eq!(row.public_key, 0x0202);
        assert_eq!(row.name, 0x0303);
        assert_eq!(row.culture, 0x0404);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x04, 0x80, 0x00, 0x00, // hash_alg_id
            0x01, 0x00, // major_version
            0x00, 0x00, // minor_version
            0x00, 0x00, // build_number
            0x00, 0x00, // revision_number
            0x00, 0x00, 0x00, 0x00, // flags
            0x02, 0x02, 0x02, 0x02, // public_key
            0x03, 0x03, 0x03, 0x03, // name
            0x04, 0x04, 0x04, 0x04, // culture
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Assembly, 1)],
            true,
            true,
            false,
        ));
        let table = MetadataTable::<AssemblyRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.public_key, 0x0202_0202);
        assert_eq!(row.culture, 0x0404_0404);
    }

    #[test]
    fn write_round_trip() {
        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::Assembly, 1)],
            false,
            false,
            false,
        ));

        let row = AssemblyRaw {
            rid: 1,
            token: Token::new(0x2000_0001),
            offset: 0,
            hash_alg_id: 0x8004,
            major_version: 1,
            minor_version: 3,
            build_number: 3,
            revision_number: 7,
            flags: 0,
            public_key: 0,
            name: 0x10,
            culture: 0x20,
        };

        let data = write_table(std::slice::from_ref(&row), &sizes).unwrap();
        let table = MetadataTable::<AssemblyRaw>::new(&data, 1, sizes).unwrap();
        assert_eq!(table.get(1).unwrap(), row);
    }
}
