//! Contiguous regions: zero-copy views and compacting copies.

use std::sync::Arc;

use crate::column::{same_columns, ColumnRef};
use crate::error::Result;
use crate::shared_array::{compact_array, compact_offsets, same_optional};
use crate::validation::check_valid_region;

use super::layout::RowLayout;
use super::row_block::RowBlock;

/// View over `[position, position + length)` sharing every array.
pub(crate) fn region<L: RowLayout + ?Sized>(
    layout: &L,
    position: usize,
    length: usize,
) -> Result<RowBlock> {
    check_valid_region(layout.position_count(), position, length)?;
    Ok(RowBlock::new_unchecked(
        layout.offset_base() + position,
        length,
        layout.row_is_null().cloned(),
        layout.field_offsets().cloned(),
        layout.raw_field_columns().clone(),
    ))
}

/// Copy of `[position, position + length)` with offsets and null mask
/// narrowed to the window.
///
/// When no array had to change, the result shares the layout's arrays
/// instead of allocating. Allocating anyway would be equally correct.
pub(crate) fn copy_region<L: RowLayout + ?Sized>(
    layout: &L,
    position: usize,
    length: usize,
) -> Result<RowBlock> {
    check_valid_region(layout.position_count(), position, length)?;

    let start = layout.field_offset_of(position);
    let end = layout.field_offset_of(position + length);
    let raw_columns = layout.raw_field_columns();
    let field_columns = raw_columns
        .iter()
        .map(|column| Arc::clone(column).copy_region(start, end - start))
        .collect::<Result<Vec<ColumnRef>>>()?;

    let index = position + layout.offset_base();
    let field_offsets = layout
        .field_offsets()
        .map(|offsets| compact_offsets(offsets, index, length));
    let row_is_null = layout
        .row_is_null()
        .map(|mask| compact_array(mask, index, length));

    if same_columns(&field_columns, raw_columns)
        && same_optional(field_offsets.as_ref(), layout.field_offsets())
        && same_optional(row_is_null.as_ref(), layout.row_is_null())
    {
        tracing::trace!(position, length, "Region copy unchanged, sharing source arrays");
        return Ok(layout.share());
    }

    Ok(RowBlock::new_unchecked(
        0,
        length,
        row_is_null,
        field_offsets,
        field_columns.into(),
    ))
}
