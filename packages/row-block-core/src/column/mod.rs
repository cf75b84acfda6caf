//! Field column capability and the concrete columns shipped with the crate.
//!
//! A row block never looks inside its field columns. It only slices,
//! gathers and measures them through [`Column`], so any columnar vector that
//! implements the trait can be a struct field, including another
//! [`RowBlock`](crate::row::RowBlock).

mod fixed_width;
mod variable_width;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{BlockError, Result};
use crate::row::{RowBlock, SingleRowBlock};

pub use fixed_width::{FixedWidth, FixedWidthColumn};
pub use variable_width::VariableWidthColumn;

/// Shared handle to a field column.
pub type ColumnRef = Arc<dyn Column>;

/// Columnar vector of values addressed by position.
///
/// Implementations are immutable. Operations that look like mutation return
/// a new column, or the same handle when nothing changed.
pub trait Column: fmt::Debug + Send + Sync + 'static {
    /// Number of positions exposed by this column.
    fn position_count(&self) -> usize;

    /// Returns `true` if the value at `position` is null.
    fn is_null(&self, position: usize) -> Result<bool>;

    /// Returns `true` if any position may be null.
    fn may_have_null(&self) -> bool;

    /// Zero-copy view over `[position, position + length)`.
    fn region(self: Arc<Self>, position: usize, length: usize) -> Result<ColumnRef>;

    /// Independent copy of `[position, position + length)`.
    ///
    /// Returns the same handle when the copy would be identical to `self`.
    fn copy_region(self: Arc<Self>, position: usize, length: usize) -> Result<ColumnRef>;

    /// Builds a compact column from `positions[offset..offset + length]`.
    fn copy_positions(&self, positions: &[usize], offset: usize, length: usize) -> Result<ColumnRef>;

    /// Bytes occupied by `[position, position + length)`.
    fn region_size_in_bytes(&self, position: usize, length: usize) -> Result<u64>;

    /// Bytes occupied by the positions selected in `mask`.
    fn positions_size_in_bytes(&self, mask: &[bool]) -> Result<u64>;

    /// Lightweight per-position size used for statistics.
    fn estimated_data_size(&self, position: usize) -> Result<u64>;

    /// Bytes occupied by all visible positions.
    fn size_in_bytes(&self) -> u64;

    /// Bytes kept alive by this column, including shared buffers.
    fn retained_size_in_bytes(&self) -> u64;

    /// Tag naming the serialized representation.
    fn encoding_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Capability cast for struct-typed columns.
    fn as_row_block(&self) -> Option<&RowBlock> {
        None
    }
}

/// Returns `true` if both column lists hold the same handles in the same order.
pub fn same_columns(a: &[ColumnRef], b: &[ColumnRef]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| Arc::ptr_eq(a, b))
}

/// Single-row view of a struct-typed column.
///
/// Fails with [`BlockError::NotARowColumn`] when `column` does not hold rows.
pub fn single_row_of(column: &dyn Column, position: usize) -> Result<SingleRowBlock> {
    let rows = column.as_row_block().ok_or(BlockError::NotARowColumn {
        encoding: column.encoding_name(),
    })?;
    rows.single_row(position)
}
