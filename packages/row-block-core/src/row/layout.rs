//! Addressing shared by row blocks and single-row views.

use crate::column::ColumnRef;
use crate::shared_array::SharedArray;

use super::row_block::RowBlock;

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::RowBlock {}
    impl Sealed for super::super::single_row::SingleRowBlock {}
}

/// Raw layout of struct rows over per-field columns.
///
/// Implemented by [`RowBlock`] and
/// [`SingleRowBlock`](super::SingleRowBlock) only.
pub trait RowLayout: sealed::Sealed {
    /// One column per struct field, all of the same length.
    fn raw_field_columns(&self) -> &SharedArray<ColumnRef>;

    /// Start entry of each row in the field columns, or `None` for identity spacing.
    fn field_offsets(&self) -> Option<&SharedArray<usize>>;

    /// Per-row null flags, or `None` when no row is null.
    fn row_is_null(&self) -> Option<&SharedArray<bool>>;

    /// Shift applied to every position before indexing the shared arrays.
    fn offset_base(&self) -> usize;

    /// Number of rows exposed.
    fn position_count(&self) -> usize;

    fn field_count(&self) -> usize {
        self.raw_field_columns().len()
    }

    /// Maps a row position to its entry index in every field column.
    ///
    /// `position` may be `position_count()` to obtain the end offset of the
    /// last row. Callers validate the position.
    fn field_offset_of(&self, position: usize) -> usize {
        let index = position + self.offset_base();
        match self.field_offsets() {
            Some(offsets) => offsets[index],
            None => index,
        }
    }

    /// Null flag of an already validated position.
    fn row_is_null_at(&self, position: usize) -> bool {
        self.row_is_null()
            .is_some_and(|mask| mask[position + self.offset_base()])
    }

    /// Block sharing every array of this layout.
    fn share(&self) -> RowBlock {
        RowBlock::new_unchecked(
            self.offset_base(),
            self.position_count(),
            self.row_is_null().cloned(),
            self.field_offsets().cloned(),
            self.raw_field_columns().clone(),
        )
    }
}
