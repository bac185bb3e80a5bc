//! `TypeRef` table (0x01): references to types defined in another scope.
//!
//! The `ResolutionScope` column is a coded index naming where the type lives:
//! the current module, an external module, an external assembly, or an
//! enclosing `TypeRef` for nested types.

use crate::{
    file::io::{read_le_at_dyn, write_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// One row of the `TypeRef` table.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeRefRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x01xxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// `ResolutionScope` coded index: where the referenced type is defined.
    pub resolution_scope: CodedIndex,
    /// `#Strings` index of the type name.
    pub name: u32,
    /// `#Strings` index of the type namespace.
    pub namespace: u32,
}

impl RowReadable for TypeRefRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* resolution_scope */ sizes.coded_index_bytes(CodedIndexType::ResolutionScope) +
            /* name */             sizes.str_bytes() +
            /* namespace */        sizes.str_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(TypeRefRaw {
            rid,
            token: Token::new(TableId::TypeRef.token_base() | rid),
            offset: *offset,
            resolution_scope: CodedIndex::read(
                data,
                offset,
                sizes,
                CodedIndexType::ResolutionScope,
            )?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            namespace: read_le_at_dyn(data, offset, sizes.is_large_str())?,
        })
    }
}

impl RowWritable for TypeRefRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <TypeRefRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        self.resolution_scope
            .write(data, offset, sizes, CodedIndexType::ResolutionScope)?;
        write_le_at_dyn(data, offset, self.name, sizes.is_large_str())?;
        write_le_at_dyn(data, offset, self.namespace, sizes.is_large_str())?;
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
            0x0A, 0x00, // resolution_scope (tag 2 = AssemblyRef, row 2)
            0x02, 0x02, // name
            0x03, 0x03, // namespace
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeRef, 1), (TableId::AssemblyRef, 5)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<TypeRefRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.token.value(), 0x0100_0001);
        assert_eq!(row.resolution_scope.tag, TableId::AssemblyRef);
        assert_eq!(row.resolution_scope.row, 2);
        assert_eq!(row.resolution_scope.token.value(), 0x2300_0002);
        assert_eq!(row.name, 0x0202);
        assert_eq!(row.namespace, 0x0303);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x0A, 0x00, 0x00, 0x00, // resolution_scope
            0x02, 0x02, 0x02, 0x02, // name
            0x03, 0x03, 0x03, 0x03, // namespace
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeRef, u32::from(u16::MAX) + 3)],
            true,
            false,
            false,
        ));
        let table = MetadataTable::<TypeRefRaw>::new(&data, 1, sizes).unwrap();

        let row = table.get(1).unwrap();
        assert_eq!(row.resolution_scope.tag, TableId::AssemblyRef);
        assert_eq!(row.name, 0x0202_0202);
    }

    #[test]
    fn write_round_trip() {
        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeRef, 2), (TableId::AssemblyRef, 5)],
            false,
            false,
            false,
        ));

        let row = TypeRefRaw {
            rid: 1,
            token: Token::new(0x0100_0001),
            offset: 0,
            resolution_scope: CodedIndex::new(TableId::AssemblyRef, 2),
            name: 0x10,
            namespace: 0x20,
        };

        let data = write_table(std::slice::from_ref(&row), &sizes).unwrap();
        assert_eq!(data.len(), 6);

        let table = MetadataTable::<TypeRefRaw>::new(&data, 1, sizes).unwrap();
        assert_eq!(table.get(1).unwrap(), row);
    }
}
