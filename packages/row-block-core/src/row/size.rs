//! Byte-size accounting for memory budgeting.

use std::mem::size_of;

use crate::error::Result;
use crate::validation::{check_valid_positions, check_valid_region};

use super::layout::RowLayout;

/// Per-row bookkeeping: one offset slot plus one null flag.
pub const ROW_OVERHEAD_BYTES: u64 = (size_of::<usize>() + size_of::<bool>()) as u64;

pub(crate) fn region_size_in_bytes<L: RowLayout + ?Sized>(
    layout: &L,
    position: usize,
    length: usize,
) -> Result<u64> {
    check_valid_region(layout.position_count(), position, length)?;

    let start = layout.field_offset_of(position);
    let end = layout.field_offset_of(position + length);

    let mut size = ROW_OVERHEAD_BYTES * length as u64;
    for column in layout.raw_field_columns().iter() {
        size += column.region_size_in_bytes(start, end - start)?;
    }
    Ok(size)
}

/// Expands the selected rows to the field entries they span and sums the
/// field columns' sizes over that selection.
pub(crate) fn positions_size_in_bytes<L: RowLayout + ?Sized>(
    layout: &L,
    mask: &[bool],
) -> Result<u64> {
    check_valid_positions(mask, layout.position_count())?;

    let columns = layout.raw_field_columns();
    let field_length = columns.first().map_or(0, |column| column.position_count());
    let mut field_mask = vec![false; field_length];
    let mut used_positions = 0u64;
    for (position, _) in mask.iter().enumerate().filter(|&(_, &selected)| selected) {
        used_positions += 1;
        let start = layout.field_offset_of(position);
        let end = layout.field_offset_of(position + 1);
        field_mask[start..end].fill(true);
    }

    let mut size = ROW_OVERHEAD_BYTES * used_positions;
    for column in columns.iter() {
        size += column.positions_size_in_bytes(&field_mask)?;
    }
    Ok(size)
}
