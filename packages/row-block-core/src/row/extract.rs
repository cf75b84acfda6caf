//! Single-row extraction.

use std::sync::Arc;

use crate::column::ColumnRef;
use crate::error::Result;
use crate::shared_array::SharedArray;
use crate::validation::check_readable_position;

use super::layout::RowLayout;
use super::row_block::RowBlock;
use super::single_row::SingleRowBlock;

pub(crate) fn single_row<L: RowLayout + ?Sized>(layout: &L, position: usize) -> Result<SingleRowBlock> {
    check_readable_position(layout.position_count(), position)?;

    let row_offset = layout.field_offset_of(position);
    let field_columns = layout.raw_field_columns().clone();
    if layout.row_is_null_at(position) {
        let width = layout.field_offset_of(position + 1) - row_offset;
        return Ok(SingleRowBlock::null(row_offset, width, field_columns));
    }
    Ok(SingleRowBlock::new(row_offset, field_columns))
}

/// Copies one row into a new block; a null row keeps its mask and span.
pub(crate) fn single_value_block<L: RowLayout + ?Sized>(layout: &L, position: usize) -> Result<RowBlock> {
    check_readable_position(layout.position_count(), position)?;

    let start = layout.field_offset_of(position);
    let end = layout.field_offset_of(position + 1);
    let width = end - start;
    let field_columns = layout
        .raw_field_columns()
        .iter()
        .map(|column| Arc::clone(column).copy_region(start, width))
        .collect::<Result<Vec<ColumnRef>>>()?;

    let (row_is_null, field_offsets) = if layout.row_is_null_at(position) {
        (
            Some(SharedArray::from(vec![true])),
            Some(SharedArray::from(vec![0, width])),
        )
    } else {
        (None, None)
    };
    Ok(RowBlock::new_unchecked(
        0,
        1,
        row_is_null,
        field_offsets,
        field_columns.into(),
    ))
}

pub(crate) fn estimated_data_size<L: RowLayout + ?Sized>(layout: &L, position: usize) -> Result<u64> {
    check_readable_position(layout.position_count(), position)?;
    if layout.row_is_null_at(position) {
        return Ok(0);
    }

    let field_offset = layout.field_offset_of(position);
    let mut size = 0;
    for column in layout.raw_field_columns().iter() {
        size += column.estimated_data_size(field_offset)?;
    }
    Ok(size)
}
