//! Generic row codec infrastructure.
//!
//! A table is `row_count` copies of one fixed-width row layout; the layout
//! itself depends on the [`TableInfoRef`] in effect. [`RowReadable`] and
//! [`RowWritable`] are the two halves of the codec a concrete row type
//! implements, [`MetadataTable`] wraps raw bytes with typed access and
//! [`write_table`] serializes rows back out, verifying that every row emits
//! exactly its declared width.

use std::marker::PhantomData;

use crate::{metadata::tables::TableInfoRef, Result};

/// Read half of the row codec: size calculation and decoding of one row.
pub trait RowReadable: Sized + Send {
    /// Size in bytes of one row under the given table configuration.
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Decode the row at `offset`, advancing the offset past it. `rid` is the
    /// 1-based row index used to form the row's token.
    ///
    /// # Errors
    /// Returns an error if the buffer is too short or a column is malformed.
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// Write half of the row codec: encoding of one row at its declared width.
pub trait RowWritable: Sized + Send {
    /// Size in bytes of one row under the given table configuration.
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Encode the row at `offset`, advancing the offset past it.
    ///
    /// # Errors
    /// Returns an error if the buffer is too short or a value does not fit
    /// its column width.
    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()>;
}

/// Typed view over the raw bytes of one metadata table.
///
/// Rows are decoded on demand; iteration and random access never mutate the
/// underlying data.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _phantom: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a table view over `data` holding `row_count` rows.
    ///
    /// # Errors
    /// Returns an error if `data` is shorter than `row_count` full rows.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes);
        if (data.len() as u64) < u64::from(row_count) * u64::from(row_size) {
            return Err(malformed_error!(
                "Table data too short - {} bytes for {} rows of {}",
                data.len(),
                row_count,
                row_size
            ));
        }

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _phantom: PhantomData,
        })
    }

    /// Total size of the table in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.row_size)
    }

    /// Size in bytes of a single row.
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Number of rows in the table.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Decode the row at the 1-based `index`. Returns `None` for index 0,
    /// an index past the end, or a row that fails to decode.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<T> {
        if index == 0 || self.row_count < index {
            return None;
        }

        T::row_read(
            self.data,
            &mut ((index as usize - 1) * self.row_size as usize),
            index,
            &self.sizes,
        )
        .ok()
    }

    /// Sequential iterator over all rows.
    #[must_use]
    pub fn iter(&'a self) -> TableIterator<'a, T> {
        TableIterator {
            table: self,
            current_row: 0,
            current_offset: 0,
        }
    }
}

impl<'a, T: RowReadable> IntoIterator for &'a MetadataTable<'a, T> {
    type Item = T;
    type IntoIter = TableIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy sequential iterator over the rows of a [`MetadataTable`].
pub struct TableIterator<'a, T> {
    table: &'a MetadataTable<'a, T>,
    current_row: u32,
    current_offset: usize,
}

impl<T: RowReadable> Iterator for TableIterator<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row >= self.table.row_count {
            return None;
        }

        self.current_row += 1;
        T::row_read(
            self.table.data,
            &mut self.current_offset,
            self.current_row,
            &self.table.sizes,
        )
        .ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.table.row_count - self.current_row) as usize;
        (remaining, Some(remaining))
    }
}

/// Serialize `rows` into a fresh buffer, one after the other.
///
/// Every row must advance the write cursor by exactly its declared
/// [`RowWritable::row_size`]; a mismatch aborts the write.
///
/// # Errors
/// Returns an error if any row fails to encode or emits a width different
/// from its declared row size.
pub fn write_table<T: RowWritable>(rows: &[T], sizes: &TableInfoRef) -> Result<Vec<u8>> {
    let row_size = T::row_size(sizes) as usize;
    let mut data = vec![0u8; rows.len() * row_size];
    let mut offset = 0;

    for (position, row) in rows.iter().enumerate() {
        let start = offset;
        row.row_write(&mut data, &mut offset, position as u32 + 1, sizes)?;

        if offset - start != row_size {
            return Err(crate::Error::ModificationInvalid(format!(
                "Row {} emitted {} bytes, expected {}",
                position + 1,
                offset - start,
                row_size
            )));
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::io::{read_le_at, write_le_at};
    use crate::metadata::tables::TableInfo;
    use std::sync::Arc;

    struct PairRow {
        rid: u32,
        first: u16,
        second: u16,
    }

    impl RowReadable for PairRow {
        fn row_size(_sizes: &TableInfoRef) -> u32 {
            4
        }

        fn row_read(
            data: &[u8],
            offset: &mut usize,
            rid: u32,
            _sizes: &TableInfoRef,
        ) -> Result<Self> {
            Ok(PairRow {
                rid,
                first: read_le_at::<u16>(data, offset)?,
                second: read_le_at::<u16>(data, offset)?,
            })
        }
    }

    impl RowWritable for PairRow {
        fn row_size(_sizes: &TableInfoRef) -> u32 {
            4
        }

        fn row_write(
            &self,
            data: &mut [u8],
            offset: &mut usize,
            _rid: u32,
            _sizes: &TableInfoRef,
        ) -> Result<()> {
            write_le_at(data, offset, self.first)?;
            write_le_at(data, offset, self.second)
        }
    }

    #[test]
    fn iteration_and_random_access() {
        let data = [0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04, 0x00];
        let sizes = Arc::new(TableInfo::new_test(&[], false, false, false));
        let table = MetadataTable::<PairRow>::new(&data, 2, sizes).unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.size(), 8);

        let rows: Vec<PairRow> = table.iter().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rid, 1);
        assert_eq!(rows[0].first, 1);
        assert_eq!(rows[1].second, 4);

        assert_eq!(table.get(2).unwrap().first, 3);
        assert!(table.get(0).is_none());
        assert!(table.get(3).is_none());
    }

    #[test]
    fn short_buffer_rejected() {
        let data = [0x01, 0x00];
        let sizes = Arc::new(TableInfo::new_test(&[], false, false, false));
        assert!(MetadataTable::<PairRow>::new(&data, 2, sizes).is_err());
    }

    #[test]
    fn write_round_trip() {
        let sizes = Arc::new(TableInfo::new_test(&[], false, false, false));
        let rows = vec![
            PairRow {
                rid: 1,
                first: 0x1111,
                second: 0x2222,
            },
            PairRow {
                rid: 2,
                first: 0x3333,
                second: 0x4444,
            },
        ];

        let data = write_table(&rows, &sizes).unwrap();
        assert_eq!(data, [0x11, 0x11, 0x22, 0x22, 0x33, 0x33, 0x44, 0x44]);

        let table = MetadataTable::<PairRow>::new(&data, 2, sizes).unwrap();
        assert_eq!(table.get(2).unwrap().first, 0x3333);
    }
}
