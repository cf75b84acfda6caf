//! Shared fixtures: a row model and blocks built from it.

use std::sync::Arc;

use anyhow::Context;

use row_block_core::shared_array::SharedArray;
use row_block_core::{ColumnRef, FixedWidthColumn, RowBlock, VariableWidthColumn};

/// Model row: `None` is a null row.
pub type ModelRow = Option<(i64, String)>;

/// Builds a two-field block (`id`, `name`) holding `rows`.
///
/// With `compact_nulls`, null rows own no field entries and the block
/// carries explicit offsets; otherwise every row owns one entry.
pub fn build_block(rows: &[ModelRow], compact_nulls: bool) -> RowBlock {
    let stored: Vec<&ModelRow> = rows
        .iter()
        .filter(|row| !compact_nulls || row.is_some())
        .collect();

    let ids: ColumnRef = Arc::new(FixedWidthColumn::from_options(
        stored.iter().map(|row| row.as_ref().map(|(id, _)| *id)),
    ));
    let names: ColumnRef = Arc::new(VariableWidthColumn::from_strs(
        stored.iter().map(|row| row.as_ref().map(|(_, name)| name.as_str())),
    ));

    let row_is_null: Vec<bool> = rows.iter().map(Option::is_none).collect();
    let field_offsets = compact_nulls.then(|| {
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut next = 0;
        offsets.push(next);
        for row in rows {
            next += usize::from(row.is_some());
            offsets.push(next);
        }
        SharedArray::from(offsets)
    });

    RowBlock::new(
        0,
        rows.len(),
        Some(SharedArray::from(row_is_null)),
        field_offsets,
        vec![ids, names],
    )
    .expect("fixture block must be valid")
}

/// Reads row `position` back into the model representation.
pub fn read_row(block: &RowBlock, position: usize) -> anyhow::Result<ModelRow> {
    if block.is_null(position)? {
        return Ok(None);
    }
    let row = block.single_row(position)?;
    let id = row
        .field(0)?
        .as_any()
        .downcast_ref::<FixedWidthColumn<i64>>()
        .context("id field is not a long column")?
        .get(row.row_offset())?
        .context("id is null in a non-null row")?;
    let name = row
        .field(1)?
        .as_any()
        .downcast_ref::<VariableWidthColumn>()
        .context("name field is not a variable width column")?
        .get_str(row.row_offset())?
        .context("name is null in a non-null row")?
        .into_owned();
    Ok(Some((id, name)))
}

/// Reads every row of `block`.
pub fn read_rows(block: &RowBlock) -> anyhow::Result<Vec<ModelRow>> {
    (0..block.position_count())
        .map(|position| read_row(block, position))
        .collect()
}

/// Model rows `0..count` where every row divisible by `null_every` is null.
pub fn model_rows(count: usize, null_every: usize) -> Vec<ModelRow> {
    (0..count)
        .map(|i| {
            if null_every > 0 && i % null_every == 0 {
                None
            } else {
                Some((i as i64 * 10, format!("row-{}", i)))
            }
        })
        .collect()
}
