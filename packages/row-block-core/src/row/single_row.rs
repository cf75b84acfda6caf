//! Single-row view over a row block's field columns.

use std::sync::Arc;

use crate::column::ColumnRef;
use crate::error::{BlockError, Result};
use crate::shared_array::SharedArray;

use super::extract;
use super::layout::RowLayout;
use super::row_block::RowBlock;

/// One row of a parent block, pinned at its field-column entry.
///
/// Shares the parent's field columns; nothing is copied until one of the
/// `*_block` methods is called. A null row keeps its flag and its span in
/// the parent's field columns, which may be empty.
#[derive(Debug, Clone)]
pub struct SingleRowBlock {
    row_offset: usize,
    field_columns: SharedArray<ColumnRef>,
    row_is_null: Option<SharedArray<bool>>,
    field_offsets: Option<SharedArray<usize>>,
}

impl SingleRowBlock {
    /// View of a non-null row owning entry `row_offset`.
    pub(crate) fn new(row_offset: usize, field_columns: SharedArray<ColumnRef>) -> Self {
        Self {
            row_offset,
            field_columns,
            row_is_null: None,
            field_offsets: None,
        }
    }

    /// View of a null row spanning `width` entries from `row_offset`.
    pub(crate) fn null(row_offset: usize, width: usize, field_columns: SharedArray<ColumnRef>) -> Self {
        Self {
            row_offset,
            field_columns,
            row_is_null: Some(SharedArray::from(vec![true])),
            field_offsets: Some(SharedArray::from(vec![row_offset, row_offset + width])),
        }
    }

    /// Entry index of this row in every field column.
    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    pub fn field_count(&self) -> usize {
        self.field_columns.len()
    }

    /// Returns `true` if the row was null in its parent block.
    pub fn is_null(&self) -> bool {
        self.row_is_null.is_some()
    }

    /// Number of field entries owned by this row.
    fn width(&self) -> usize {
        match &self.field_offsets {
            Some(offsets) => offsets[1] - offsets[0],
            None => 1,
        }
    }

    /// Field column holding field `index` of this row at [`row_offset`](Self::row_offset).
    pub fn field(&self, index: usize) -> Result<&ColumnRef> {
        self.field_columns
            .get(index)
            .ok_or(BlockError::PositionOutOfRange {
                position: index,
                position_count: self.field_columns.len(),
            })
    }

    /// Returns `true` if field `index` of this row is null.
    ///
    /// Every field of a null row is null.
    pub fn is_field_null(&self, index: usize) -> Result<bool> {
        let field = self.field(index)?;
        if self.is_null() {
            return Ok(true);
        }
        field.is_null(self.row_offset)
    }

    /// Copy of field `index` over this row's span; empty for a null row without entries.
    pub fn field_value_block(&self, index: usize) -> Result<ColumnRef> {
        Arc::clone(self.field(index)?).copy_region(self.row_offset, self.width())
    }

    pub fn field_estimated_data_size(&self, index: usize) -> Result<u64> {
        let field = self.field(index)?;
        if self.is_null() {
            return Ok(0);
        }
        field.estimated_data_size(self.row_offset)
    }

    /// Bytes occupied by this row's field values.
    pub fn size_in_bytes(&self) -> Result<u64> {
        let width = self.width();
        let mut size = 0;
        for column in self.field_columns.iter() {
            size += column.region_size_in_bytes(self.row_offset, width)?;
        }
        Ok(size)
    }

    /// Independent one-row block holding this row's values.
    pub fn to_row_block(&self) -> Result<RowBlock> {
        extract::single_value_block(self, 0)
    }
}

impl RowLayout for SingleRowBlock {
    fn raw_field_columns(&self) -> &SharedArray<ColumnRef> {
        &self.field_columns
    }

    fn field_offsets(&self) -> Option<&SharedArray<usize>> {
        self.field_offsets.as_ref()
    }

    fn row_is_null(&self) -> Option<&SharedArray<bool>> {
        self.row_is_null.as_ref()
    }

    fn offset_base(&self) -> usize {
        // Explicit offsets already hold the row's entry
        if self.field_offsets.is_some() {
            0
        } else {
            self.row_offset
        }
    }

    fn position_count(&self) -> usize {
        1
    }
}
