//! Coded indices: compact cross-table references (ECMA-335 II.24.2.6).
//!
//! A coded index packs a small tag selecting the target table into the low
//! bits and the 1-based row index into the remaining bits. Its physical width
//! is 2 bytes unless the combined value could overflow 16 bits for any of the
//! possible target tables, in which case it widens to 4.

use strum::{EnumCount, EnumIter};

use crate::{
    file::io::{read_le_at_dyn, write_le_at_dyn},
    metadata::{
        tables::{TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

/// The coded index families used by the supported tables.
///
/// Each variant fixes the ordered list of target tables; the position of a
/// table in that list is its tag value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumIter, EnumCount)]
pub enum CodedIndexType {
    /// `TypeDef`, `TypeRef` or `TypeSpec` (2 tag bits). Used by the
    /// `Extends` column of `TypeDef`.
    TypeDefOrRef,
    /// `Field`, `Param` or `Property` (2 tag bits). Used by the `Parent`
    /// column of `Constant`.
    HasConstant,
    /// `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef` or `TypeSpec`
    /// (3 tag bits). Used by the `Class` column of `MemberRef`.
    MemberRefParent,
    /// `Module`, `ModuleRef`, `AssemblyRef` or `TypeRef` (2 tag bits).
    /// Used by the `ResolutionScope` column of `TypeRef`.
    ResolutionScope,
}

impl CodedIndexType {
    /// The ordered target tables of this coded index family. A table's
    /// position in the slice is its tag value.
    #[must_use]
    pub fn tables(&self) -> &'static [TableId] {
        match self {
            CodedIndexType::TypeDefOrRef => {
                &[TableId::TypeDef, TableId::TypeRef, TableId::TypeSpec]
            }
            CodedIndexType::HasConstant => &[TableId::Field, TableId::Param, TableId::Property],
            CodedIndexType::MemberRefParent => &[
                TableId::TypeDef,
                TableId::TypeRef,
                TableId::ModuleRef,
                TableId::MethodDef,
                TableId::TypeSpec,
            ],
            CodedIndexType::ResolutionScope => &[
                TableId::Module,
                TableId::ModuleRef,
                TableId::AssemblyRef,
                TableId::TypeRef,
            ],
        }
    }

    /// Number of low bits used by the tag.
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        let count = self.tables().len() as u32;
        (32 - (count - 1).leading_zeros()) as u8
    }
}

/// A decoded coded index: target table, row and the equivalent token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodedIndex {
    /// The table this index refers to.
    pub tag: TableId,
    /// The 1-based row within that table. Row 0 is the null reference.
    pub row: u32,
    /// The token equivalent of this reference.
    pub token: Token,
}

impl CodedIndex {
    /// Create a coded index from its decoded parts.
    #[must_use]
    pub fn new(tag: TableId, row: u32) -> CodedIndex {
        CodedIndex {
            tag,
            row,
            token: Token::new(tag.token_base() | row),
        }
    }

    /// Read a coded index column at `offset`, using `info` to determine the
    /// physical width.
    ///
    /// # Errors
    /// Returns an error if the buffer is too short or the tag does not name a
    /// target table of `ci_type`.
    pub fn read(
        data: &[u8],
        offset: &mut usize,
        info: &TableInfoRef,
        ci_type: CodedIndexType,
    ) -> Result<Self> {
        let value = read_le_at_dyn(data, offset, info.coded_index_bits(ci_type) > 16)?;
        let (tag, row) = info.decode_coded_index(value, ci_type)?;
        Ok(CodedIndex::new(tag, row))
    }

    /// Write this coded index at `offset` with the physical width `info`
    /// prescribes for `ci_type`.
    ///
    /// # Errors
    /// Returns an error if the buffer is too short, this index's table is not
    /// a member of `ci_type`, or the encoded value does not fit the column.
    pub fn write(
        &self,
        data: &mut [u8],
        offset: &mut usize,
        info: &TableInfoRef,
        ci_type: CodedIndexType,
    ) -> Result<()> {
        let value = info.encode_coded_index(self.tag, self.row, ci_type)?;
        write_le_at_dyn(data, offset, value, info.coded_index_bits(ci_type) > 16)
    }
}
