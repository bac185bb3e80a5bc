//! Row counts and index widths for one tables stream.
//!
//! Every variable-width decision in the row codec funnels through
//! [`TableInfo`]: heap indices are 2 bytes unless the corresponding heap-size
//! flag is set, table indices are 2 bytes unless the target table has more
//! than 0xFFFF rows, and coded indices widen when the largest target table's
//! row bits plus the tag bits exceed 16.

use std::sync::Arc;

use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le_at,
    metadata::tables::{CodedIndexType, TableId},
    Error::OutOfBounds,
    Result,
};

/// Row count and derived index size of a single table.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Number of rows in the table.
    pub rows: u32,
    /// Bits required to represent any valid row index.
    pub bits: u8,
    /// True if indices into this table take 4 bytes instead of 2.
    pub is_large: bool,
}

impl TableRowInfo {
    /// Derive the index size information for a table with `rows` rows.
    #[must_use]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// The size oracle for one tables stream: row counts per table, heap-size
/// flags, and the cached widths of every coded index family.
#[derive(Clone, Default)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Cheap-copy reference to a [`TableInfo`].
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Parse the size information out of a `#~` stream header.
    ///
    /// `data` must start at the beginning of the tables stream: the 24-byte
    /// header (heap-size flags at offset 6, valid bitvector at offset 8)
    /// followed by one `u32` row count per set bit in the bitvector.
    ///
    /// # Errors
    /// Returns an error if the header or the row count array is truncated.
    pub fn new(data: &[u8]) -> Result<Self> {
        if data.len() < 24 {
            return Err(OutOfBounds);
        }

        let heap_size_flags = data[6];
        let valid_bitvec = read_le_at::<u64>(data, &mut 8)?;

        let mut rows = vec![TableRowInfo::default(); TableId::GenericParamConstraint as usize + 1];
        let mut next_row_offset = 24;

        for table_id in TableId::iter() {
            if (valid_bitvec & (1 << table_id as usize)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            if row_count == 0 {
                continue;
            }

            rows[table_id as usize] = TableRowInfo::new(row_count);
        }

        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: heap_size_flags & 1 == 1,
            is_large_index_guid: heap_size_flags & 2 == 2,
            is_large_index_blob: heap_size_flags & 4 == 4,
        };

        table_info.calculate_coded_index_bits();
        Ok(table_info)
    }

    #[cfg(test)]
    /// Test constructor taking explicit `(table, row_count)` pairs and heap
    /// size flags.
    pub fn new_test(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_blob: bool,
        large_guid: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); TableId::GenericParamConstraint as usize + 1],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        for (table_id, row_count) in valid_tables {
            table_info.rows[*table_id as usize] = TableRowInfo::new(*row_count);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Split a coded index value into its target table and row index.
    ///
    /// # Errors
    /// Returns an error if the tag does not name a target table of
    /// `coded_index_type`.
    pub fn decode_coded_index(
        &self,
        value: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<(TableId, u32)> {
        let tables = coded_index_type.tables();
        let tag_bits = coded_index_type.tag_bits();

        let tag = (value & ((1 << tag_bits) - 1)) as usize;
        let row = value >> tag_bits;

        if tag >= tables.len() {
            return Err(malformed_error!(
                "Invalid tag {} for coded index {:?}",
                tag,
                coded_index_type
            ));
        }

        Ok((tables[tag], row))
    }

    /// Combine a target table and row index into a coded index value.
    ///
    /// # Errors
    /// Returns [`crate::Error::ModificationInvalid`] if `table` is not a
    /// member of `coded_index_type` or the row does not fit the value.
    pub fn encode_coded_index(
        &self,
        table: TableId,
        row: u32,
        coded_index_type: CodedIndexType,
    ) -> Result<u32> {
        let tables = coded_index_type.tables();
        let tag_bits = coded_index_type.tag_bits();

        let Some(tag) = tables.iter().position(|candidate| *candidate == table) else {
            return Err(crate::Error::ModificationInvalid(format!(
                "Table {table:?} is not a member of coded index {coded_index_type:?}"
            )));
        };

        if row >= (1 << (32 - tag_bits)) {
            return Err(crate::Error::ModificationInvalid(format!(
                "Row {row} does not fit coded index {coded_index_type:?}"
            )));
        }

        Ok((row << tag_bits) | tag as u32)
    }

    /// True if indices into `id` take 4 bytes instead of 2.
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// True if `#Strings` indices take 4 bytes instead of 2.
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// True if `#GUID` indices take 4 bytes instead of 2.
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// True if `#Blob` indices take 4 bytes instead of 2.
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Byte width of a `#Strings` index column.
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Byte width of a `#GUID` index column.
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Byte width of a `#Blob` index column.
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Row count and index size information for `table`.
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// Byte width of an index column into `table_id`.
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Cached bit width of a coded index family.
    #[must_use]
    pub fn coded_index_bits(&self, coded_index_type: CodedIndexType) -> u8 {
        self.coded_indexes[coded_index_type as usize]
    }

    /// Byte width of a coded index column.
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let max_bits = coded_index
                .tables()
                .iter()
                .map(|table| self.rows[*table as usize].bits)
                .max()
                .unwrap_or(1);

            self.coded_indexes[coded_index as usize] = max_bits + coded_index.tag_bits();
        }
    }
}
