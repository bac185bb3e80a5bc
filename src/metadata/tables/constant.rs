//! `Constant` table (0x0B): compile-time default values for fields,
//! parameters and properties.
//!
//! The `base_type` column is the element type tag of the value blob; the
//! padding byte after it must be zero. The parent is a `HasConstant` coded
//! index.

use crate::{
    file::io::{read_le_at, read_le_at_dyn, write_le_at, write_le_at_dyn},
    metadata::{
        signatures::{read_element, ElementValue, TypeSignature, ELEMENT_TYPE},
        streams::Blob,
        tables::{CodedIndex, CodedIndexType, RowReadable, RowWritable, TableId, TableInfoRef},
        token::Token,
        typesystem::TypeResolver,
    },
    Error, Parser, Result,
};

/// One row of the `Constant` table.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantRaw {
    /// 1-based row index.
    pub rid: u32,
    /// Token of this row (`0x0Bxxxxxx`).
    pub token: Token,
    /// Byte offset of this row inside the table data.
    pub offset: usize,
    /// Element type tag of the value blob.
    pub base_type: u8,
    /// `HasConstant` coded index: the field, parameter or property owning
    /// this value.
    pub parent: CodedIndex,
    /// `#Blob` index of the encoded value.
    pub value: u32,
}

impl ConstantRaw {
    /// Decode the constant value from its blob, typed by the `base_type`
    /// tag.
    ///
    /// # Errors
    /// Returns an error if the tag has no element encoding, the blob index is
    /// invalid, or the blob holds fewer bytes than the tag prescribes.
    pub fn decode_value(&self, blob: &Blob, resolver: &dyn TypeResolver) -> Result<ElementValue> {
        let signature = match self.base_type {
            ELEMENT_TYPE::BOOLEAN => TypeSignature::Boolean,
            ELEMENT_TYPE::CHAR => TypeSignature::Char,
            ELEMENT_TYPE::I1 => TypeSignature::I1,
            ELEMENT_TYPE::U1 => TypeSignature::U1,
            ELEMENT_TYPE::I2 => TypeSignature::I2,
            ELEMENT_TYPE::U2 => TypeSignature::U2,
            ELEMENT_TYPE::I4 => TypeSignature::I4,
            ELEMENT_TYPE::U4 => TypeSignature::U4,
            ELEMENT_TYPE::I8 => TypeSignature::I8,
            ELEMENT_TYPE::U8 => TypeSignature::U8,
            ELEMENT_TYPE::R4 => TypeSignature::R4,
            ELEMENT_TYPE::R8 => TypeSignature::R8,
            ELEMENT_TYPE::STRING => TypeSignature::String,
            // CLASS constants may only hold the 4-byte zero null reference
            ELEMENT_TYPE::CLASS => {
                return match blob.get(self.value as usize)? {
                    [0, 0, 0, 0] => Ok(ElementValue::U4(0)),
                    _ => Err(Error::UnsupportedElement(ELEMENT_TYPE::CLASS)),
                }
            }
            other => return Err(Error::UnsupportedElement(other)),
        };

        let mut parser = Parser::new(blob.get(self.value as usize)?);
        read_element(&mut parser, &signature, resolver)
    }
}

impl RowReadable for ConstantRaw {
    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* base_type */ 1 +
            /* padding */   1 +
            /* parent */    sizes.coded_index_bytes(CodedIndexType::HasConstant) +
            /* value */     sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let base_type = read_le_at::<u8>(data, offset)?;
        // Reserved padding byte
        read_le_at::<u8>(data, offset)?;

        Ok(ConstantRaw {
            rid,
            token: Token::new(TableId::Constant.token_base() | rid),
            offset: *offset - 2,
            base_type,
            parent: CodedIndex::read(data, offset, sizes, CodedIndexType::HasConstant)?,
            value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

impl RowWritable for ConstantRaw {
    fn row_size(sizes: &TableInfoRef) -> u32 {
        <ConstantRaw as RowReadable>::row_size(sizes)
    }

    fn row_write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        _rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<()> {
        write_le_at::<u8>(data, offset, self.base_type)?;
        write_le_at::<u8>(data, offset, 0)?;
        self.parent
            .write(data, offset, sizes, CodedIndexType::HasConstant)?;
        write_le_at_dyn(data, offset, self.value, sizes.is_large_blob())?;
        Ok(())
    }
}
