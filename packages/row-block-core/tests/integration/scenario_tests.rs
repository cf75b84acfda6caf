//! Scenarios for gather, region and single-row extraction.

use ntest::timeout;

use row_block_core::row::ROW_OVERHEAD_BYTES;
use row_block_core::{BlockError, RowBlock, RowLayout};

use super::helpers::{build_block, model_rows, read_rows, ModelRow};

fn row(id: i64, name: &str) -> ModelRow {
    Some((id, name.to_string()))
}

/// 3 rows, 2 fields, row 1 null: gathering in reverse keeps the null in the middle.
#[timeout(1000)]
#[test]
fn test_reverse_gather_with_null() -> anyhow::Result<()> {
    let block = build_block(&[row(0, "zero"), None, row(2, "two")], false);

    let gathered = block.gather(&[2, 1, 0])?;

    assert_eq!(gathered.position_count(), 3);
    assert_eq!(
        read_rows(&gathered)?,
        vec![row(2, "two"), None, row(0, "zero")]
    );
    assert!(gathered.may_have_null());
    assert!(gathered.has_field_offsets());
    Ok(())
}

/// 5 rows without nulls: a partial region copy is a new 3-row block.
#[timeout(1000)]
#[test]
fn test_partial_region_copy() -> anyhow::Result<()> {
    let rows = model_rows(5, 0);
    let block = build_block(&rows, false);

    let copy = block.copy_region(1, 3)?;

    assert!(!RowBlock::ptr_eq(&copy, &block));
    assert_eq!(copy.position_count(), 3);
    assert_eq!(read_rows(&copy)?, rows[1..4].to_vec());
    for column in copy.children() {
        assert_eq!(column.position_count(), 3);
    }

    let full = block.copy_region(0, 5)?;
    assert!(RowBlock::ptr_eq(&full, &block));
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_single_position_gather_matches_source() -> anyhow::Result<()> {
    for compact_nulls in [false, true] {
        let rows = model_rows(7, 3);
        let block = build_block(&rows, compact_nulls);

        for (position, expected) in rows.iter().enumerate() {
            let gathered = block.gather(&[position])?;
            assert_eq!(gathered.position_count(), 1);
            assert_eq!(gathered.is_null(0)?, block.is_null(position)?);
            assert_eq!(read_rows(&gathered)?, vec![expected.clone()]);

            if expected.is_some() {
                // Non-null single rows are always identity spaced
                assert!(!gathered.may_have_null());
                assert!(!gathered.has_field_offsets());
            }
        }
    }
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_gather_output_without_nulls_is_canonical() -> anyhow::Result<()> {
    let rows = model_rows(9, 2);
    for compact_nulls in [false, true] {
        let block = build_block(&rows, compact_nulls);
        let non_null: Vec<usize> = (0..rows.len()).filter(|&p| rows[p].is_some()).collect();

        let gathered = block.gather(&non_null)?;

        assert!(!gathered.may_have_null());
        assert!(!gathered.has_field_offsets());
        assert!(gathered.field_offsets().is_none());
        assert!(gathered.row_is_null().is_none());
    }
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_region_view_and_copy_agree() -> anyhow::Result<()> {
    let rows = model_rows(12, 4);
    for compact_nulls in [false, true] {
        let block = build_block(&rows, compact_nulls);
        for position in 0..rows.len() {
            for length in 0..=rows.len() - position {
                let view = block.region(position, length)?;
                let copy = block.copy_region(position, length)?;
                let expected = rows[position..position + length].to_vec();

                assert_eq!(read_rows(&view)?, expected);
                assert_eq!(read_rows(&copy)?, expected);
                assert_eq!(
                    view.size_in_bytes(),
                    block.region_size_in_bytes(position, length)?
                );
            }
        }
    }
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_region_size_grows_with_length() -> anyhow::Result<()> {
    let block = build_block(&model_rows(10, 3), true);

    let mut previous = 0;
    for length in 0..=10 {
        let region_size = block.region_size_in_bytes(0, length)?;
        let mask: Vec<bool> = (0..10).map(|p| p < length).collect();
        assert_eq!(block.positions_size_in_bytes(&mask)?, region_size);
        assert!(region_size >= previous + ROW_OVERHEAD_BYTES * u64::from(length > 0));
        previous = region_size;
    }
    Ok(())
}

#[timeout(1000)]
#[test]
fn test_out_of_range_requests_fail() {
    let block = build_block(&model_rows(4, 2), true);

    assert!(matches!(
        block.region(3, 2),
        Err(BlockError::InvalidRegion { .. })
    ));
    assert!(matches!(
        block.copy_region(5, 0),
        Err(BlockError::InvalidRegion { .. })
    ));
    assert!(matches!(
        block.gather(&[4]),
        Err(BlockError::PositionOutOfRange { .. })
    ));
    assert!(matches!(
        block.single_row(4),
        Err(BlockError::PositionOutOfRange { .. })
    ));
    assert!(matches!(
        block.positions_size_in_bytes(&[true; 5]),
        Err(BlockError::PositionMaskLengthMismatch { .. })
    ));
    assert!(matches!(
        RowBlock::from_field_columns(1, None, vec![]),
        Err(BlockError::NoFields)
    ));
}

#[timeout(1000)]
#[test]
fn test_single_row_copy_is_independent() -> anyhow::Result<()> {
    let rows = model_rows(6, 2);
    let block = build_block(&rows, true);

    for (position, expected) in rows.iter().enumerate() {
        let single = block.single_value_block(position)?;
        assert_eq!(read_rows(&single)?, vec![expected.clone()]);
        assert_eq!(single.is_null(0)?, block.region(position, 1)?.is_null(0)?);
        for column in single.children() {
            assert!(column.position_count() <= 1);
        }
    }
    Ok(())
}
