//! Null-aware gather of arbitrary positions.

use crate::column::ColumnRef;
use crate::error::Result;
use crate::shared_array::SharedArray;
use crate::validation::{check_array_range, check_readable_position};

use super::layout::RowLayout;
use super::row_block::RowBlock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Gathers `positions[offset..offset + length]` into a new block at offset base 0.
///
/// Null rows contribute no field entries. When no gathered row turns out to
/// be null, the result drops both the null mask and the offsets and falls
/// back to identity spacing.
pub(crate) fn copy_positions<L: RowLayout + ?Sized>(
    layout: &L,
    positions: &[usize],
    offset: usize,
    length: usize,
) -> Result<RowBlock> {
    check_array_range(positions.len(), offset, length)?;
    let positions = &positions[offset..offset + length];
    for &position in positions {
        check_readable_position(layout.position_count(), position)?;
    }

    let mut field_positions = Vec::with_capacity(length);
    let (row_is_null, field_offsets) = if layout.row_is_null().is_none() {
        field_positions.extend(positions.iter().map(|&position| layout.field_offset_of(position)));
        (None, None)
    } else {
        let mut new_row_is_null = Vec::with_capacity(length);
        let mut new_offsets = Vec::with_capacity(length + 1);
        for &position in positions {
            new_offsets.push(field_positions.len());
            let is_null = layout.row_is_null_at(position);
            new_row_is_null.push(is_null);
            if !is_null {
                field_positions.push(layout.field_offset_of(position));
            }
        }
        new_offsets.push(field_positions.len());

        if field_positions.len() == length {
            tracing::trace!(length, "Gathered rows are all non-null, dropping null mask");
            (None, None)
        } else {
            (
                Some(SharedArray::from(new_row_is_null)),
                Some(SharedArray::from(new_offsets)),
            )
        }
    };

    let field_columns = gather_field_columns(layout.raw_field_columns(), &field_positions)?;
    Ok(RowBlock::new_unchecked(
        0,
        length,
        row_is_null,
        field_offsets,
        field_columns,
    ))
}

#[cfg(not(feature = "parallel"))]
fn gather_field_columns(
    columns: &[ColumnRef],
    field_positions: &[usize],
) -> Result<SharedArray<ColumnRef>> {
    columns
        .iter()
        .map(|column| column.copy_positions(field_positions, 0, field_positions.len()))
        .collect::<Result<Vec<_>>>()
        .map(SharedArray::from)
}

#[cfg(feature = "parallel")]
fn gather_field_columns(
    columns: &[ColumnRef],
    field_positions: &[usize],
) -> Result<SharedArray<ColumnRef>> {
    columns
        .par_iter()
        .map(|column| column.copy_positions(field_positions, 0, field_positions.len()))
        .collect::<Result<Vec<_>>>()
        .map(SharedArray::from)
}
