//! Row block over shared field columns.
//!
//! A row block holds:
//! - One field column per struct field
//! - Optional field offsets mapping rows to field entries
//! - Optional per-row null mask
//! - An offset base shifting every lookup, so regions share the arrays above

use std::any::Any;
use std::mem::size_of_val;
use std::sync::Arc;

use crate::column::{Column, ColumnRef};
use crate::config::BlockConfig;
use crate::error::{BlockError, Result};
use crate::shared_array::{same_optional, SharedArray};
use crate::validation::check_readable_position;

use super::layout::RowLayout;
use super::single_row::SingleRowBlock;
use super::{extract, gather, region, size, ROW_ENCODING};

/// Immutable columnar block of struct rows.
///
/// Cloning is cheap and shares every array. Operations return new blocks,
/// or a block sharing the same arrays when content is provably unchanged.
#[derive(Debug, Clone)]
pub struct RowBlock {
    offset_base: usize,
    position_count: usize,
    row_is_null: Option<SharedArray<bool>>,
    field_offsets: Option<SharedArray<usize>>,
    field_columns: SharedArray<ColumnRef>,
}

impl RowBlock {
    /// Creates a row block, validating every layout invariant.
    ///
    /// # Arguments
    /// * `offset_base` - Shift applied to positions before indexing the arrays
    /// * `position_count` - Number of rows exposed
    /// * `row_is_null` - Null flags covering at least `offset_base + position_count` rows
    /// * `field_offsets` - Row start entries covering at least `offset_base + position_count + 1` slots
    /// * `field_columns` - One column per field, all of equal length
    ///
    /// # Returns
    /// `Result<RowBlock, BlockError>` containing the block or the violated invariant.
    pub fn new(
        offset_base: usize,
        position_count: usize,
        row_is_null: Option<SharedArray<bool>>,
        field_offsets: Option<SharedArray<usize>>,
        field_columns: impl Into<SharedArray<ColumnRef>>,
    ) -> Result<Self> {
        Self::with_config(
            offset_base,
            position_count,
            row_is_null,
            field_offsets,
            field_columns,
            &BlockConfig::default(),
        )
    }

    /// Creates a row block with explicit construction checks.
    pub fn with_config(
        offset_base: usize,
        position_count: usize,
        row_is_null: Option<SharedArray<bool>>,
        field_offsets: Option<SharedArray<usize>>,
        field_columns: impl Into<SharedArray<ColumnRef>>,
        config: &BlockConfig,
    ) -> Result<Self> {
        let field_columns = field_columns.into();
        validate_construction(
            offset_base,
            position_count,
            row_is_null.as_ref(),
            field_offsets.as_ref(),
            &field_columns,
            config,
        )
        .inspect_err(|e| tracing::debug!(error = %e, "Rejected row block construction"))?;

        let end = offset_base + position_count;
        let row_is_null = row_is_null.filter(|mask| {
            !config.canonicalize_null_mask || mask[offset_base..end].contains(&true)
        });

        Ok(Self::new_unchecked(
            offset_base,
            position_count,
            row_is_null,
            field_offsets,
            field_columns,
        ))
    }

    /// Creates an identity-spaced block: row `i` owns entry `i` of every column.
    pub fn from_field_columns(
        position_count: usize,
        row_is_null: Option<Vec<bool>>,
        field_columns: Vec<ColumnRef>,
    ) -> Result<Self> {
        Self::new(
            0,
            position_count,
            row_is_null.map(SharedArray::from),
            None,
            field_columns,
        )
    }

    /// Creates a block whose invariants hold by construction.
    pub(crate) fn new_unchecked(
        offset_base: usize,
        position_count: usize,
        row_is_null: Option<SharedArray<bool>>,
        field_offsets: Option<SharedArray<usize>>,
        field_columns: SharedArray<ColumnRef>,
    ) -> Self {
        debug_assert!(!field_columns.is_empty());
        debug_assert!(row_is_null
            .as_ref()
            .map_or(true, |mask| mask.len() >= offset_base + position_count));
        debug_assert!(field_offsets
            .as_ref()
            .map_or(true, |offsets| offsets.len() > offset_base + position_count));
        Self {
            offset_base,
            position_count,
            row_is_null,
            field_offsets,
            field_columns,
        }
    }

    pub fn position_count(&self) -> usize {
        self.position_count
    }

    pub fn offset_base(&self) -> usize {
        self.offset_base
    }

    pub fn field_count(&self) -> usize {
        self.field_columns.len()
    }

    /// Raw field columns, one per struct field.
    pub fn children(&self) -> &[ColumnRef] {
        &self.field_columns
    }

    /// Returns `true` if a null mask is present.
    pub fn may_have_null(&self) -> bool {
        self.row_is_null.is_some()
    }

    /// Returns `true` if the block carries an explicit offsets array.
    pub fn has_field_offsets(&self) -> bool {
        self.field_offsets.is_some()
    }

    pub fn encoding_name(&self) -> &'static str {
        ROW_ENCODING
    }

    /// Returns `true` if both blocks address the same arrays in the same way.
    ///
    /// Identity of shared handles, not value equality.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        a.offset_base == b.offset_base
            && a.position_count == b.position_count
            && SharedArray::ptr_eq(&a.field_columns, &b.field_columns)
            && same_optional(a.field_offsets.as_ref(), b.field_offsets.as_ref())
            && same_optional(a.row_is_null.as_ref(), b.row_is_null.as_ref())
    }

    /// Returns `true` if the row at `position` is null.
    pub fn is_null(&self, position: usize) -> Result<bool> {
        check_readable_position(self.position_count, position)?;
        Ok(self.row_is_null_at(position))
    }

    /// Builds a compact block from `positions[offset..offset + length]`.
    ///
    /// Positions may repeat and appear in any order.
    pub fn copy_positions(&self, positions: &[usize], offset: usize, length: usize) -> Result<Self> {
        gather::copy_positions(self, positions, offset, length)
    }

    /// Builds a compact block from every position in `positions`.
    pub fn gather(&self, positions: &[usize]) -> Result<Self> {
        gather::copy_positions(self, positions, 0, positions.len())
    }

    /// Zero-copy view over `[position, position + length)`.
    pub fn region(&self, position: usize, length: usize) -> Result<Self> {
        region::region(self, position, length)
    }

    /// Independent copy of `[position, position + length)`.
    pub fn copy_region(&self, position: usize, length: usize) -> Result<Self> {
        region::copy_region(self, position, length)
    }

    /// Bytes a copy of `[position, position + length)` would occupy.
    pub fn region_size_in_bytes(&self, position: usize, length: usize) -> Result<u64> {
        size::region_size_in_bytes(self, position, length)
    }

    /// Bytes occupied by the rows selected in `mask`.
    pub fn positions_size_in_bytes(&self, mask: &[bool]) -> Result<u64> {
        size::positions_size_in_bytes(self, mask)
    }

    /// Bytes occupied by all visible rows.
    pub fn size_in_bytes(&self) -> u64 {
        let size = size::region_size_in_bytes(self, 0, self.position_count);
        // A full region is valid for any well-formed block
        debug_assert!(size.is_ok());
        size.unwrap_or_default()
    }

    /// Bytes kept alive by this block, counting shared arrays in full.
    pub fn retained_size_in_bytes(&self) -> u64 {
        size_of_val(self) as u64
            + self.field_columns.retained_size_in_bytes()
            + self
                .field_offsets
                .as_ref()
                .map_or(0, SharedArray::retained_size_in_bytes)
            + self
                .row_is_null
                .as_ref()
                .map_or(0, SharedArray::retained_size_in_bytes)
            + self
                .field_columns
                .iter()
                .map(|column| column.retained_size_in_bytes())
                .sum::<u64>()
    }

    /// View of one row sharing the field columns.
    pub fn single_row(&self, position: usize) -> Result<SingleRowBlock> {
        extract::single_row(self, position)
    }

    /// Independent one-row block copied from `position`.
    pub fn single_value_block(&self, position: usize) -> Result<Self> {
        extract::single_value_block(self, position)
    }

    /// Statistics size of one row; zero for a null row.
    pub fn estimated_data_size(&self, position: usize) -> Result<u64> {
        extract::estimated_data_size(self, position)
    }
}

impl RowLayout for RowBlock {
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
        self.offset_base
    }

    fn position_count(&self) -> usize {
        self.position_count
    }
}

impl Column for RowBlock {
    fn position_count(&self) -> usize {
        self.position_count
    }

    fn is_null(&self, position: usize) -> Result<bool> {
        RowBlock::is_null(self, position)
    }

    fn may_have_null(&self) -> bool {
        RowBlock::may_have_null(self)
    }

    fn region(self: Arc<Self>, position: usize, length: usize) -> Result<ColumnRef> {
        let view = RowBlock::region(&self, position, length)?;
        if RowBlock::ptr_eq(&view, &self) {
            return Ok(self);
        }
        Ok(Arc::new(view))
    }

    fn copy_region(self: Arc<Self>, position: usize, length: usize) -> Result<ColumnRef> {
        let copy = RowBlock::copy_region(&self, position, length)?;
        if RowBlock::ptr_eq(&copy, &self) {
            return Ok(self);
        }
        Ok(Arc::new(copy))
    }

    fn copy_positions(&self, positions: &[usize], offset: usize, length: usize) -> Result<ColumnRef> {
        Ok(Arc::new(RowBlock::copy_positions(self, positions, offset, length)?))
    }

    fn region_size_in_bytes(&self, position: usize, length: usize) -> Result<u64> {
        RowBlock::region_size_in_bytes(self, position, length)
    }

    fn positions_size_in_bytes(&self, mask: &[bool]) -> Result<u64> {
        RowBlock::positions_size_in_bytes(self, mask)
    }

    fn estimated_data_size(&self, position: usize) -> Result<u64> {
        RowBlock::estimated_data_size(self, position)
    }

    fn size_in_bytes(&self) -> u64 {
        RowBlock::size_in_bytes(self)
    }

    fn retained_size_in_bytes(&self) -> u64 {
        RowBlock::retained_size_in_bytes(self)
    }

    fn encoding_name(&self) -> &'static str {
        ROW_ENCODING
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_row_block(&self) -> Option<&RowBlock> {
        Some(self)
    }
}

/// Checks the layout invariants of caller supplied parts.
fn validate_construction(
    offset_base: usize,
    position_count: usize,
    row_is_null: Option<&SharedArray<bool>>,
    field_offsets: Option<&SharedArray<usize>>,
    field_columns: &[ColumnRef],
    config: &BlockConfig,
) -> Result<()> {
    let first = field_columns.first().ok_or(BlockError::NoFields)?;
    let field_length = first.position_count();
    for (field, column) in field_columns.iter().enumerate().skip(1) {
        if column.position_count() != field_length {
            return Err(BlockError::FieldLengthMismatch {
                field,
                expected: field_length,
                actual: column.position_count(),
            });
        }
    }

    let end = offset_base
        .checked_add(position_count)
        .ok_or(BlockError::InvalidRegion {
            position: offset_base,
            length: position_count,
            position_count: usize::MAX,
        })?;

    if let Some(mask) = row_is_null {
        if mask.len() < end {
            return Err(BlockError::InvalidNullMask {
                required: end,
                actual: mask.len(),
            });
        }
    }

    let Some(offsets) = field_offsets else {
        // Identity spacing: one entry per row slot
        if field_length < end {
            return Err(BlockError::FieldLengthMismatch {
                field: 0,
                expected: end,
                actual: field_length,
            });
        }
        return Ok(());
    };

    if offsets.len() <= end {
        return Err(BlockError::InvalidOffsets(format!(
            "offsets length {} is smaller than required {}",
            offsets.len(),
            end + 1
        )));
    }
    if offsets[end] > field_length {
        return Err(BlockError::InvalidOffsets(format!(
            "last offset {} exceeds field length {}",
            offsets[end], field_length
        )));
    }

    for position in offset_base..end {
        let width = offsets[position + 1]
            .checked_sub(offsets[position])
            .ok_or_else(|| {
                BlockError::InvalidOffsets(format!("offsets decrease at row {}", position))
            })?;
        if !config.verify_offsets {
            continue;
        }
        let is_null = row_is_null.is_some_and(|mask| mask[position]);
        if width > 1 || (width == 0 && !is_null) {
            return Err(BlockError::InvalidOffsets(format!(
                "row {} spans {} entries",
                position, width
            )));
        }
    }
    Ok(())
}
