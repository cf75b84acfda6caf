//! Bounds checks shared by blocks and columns.
//!
//! All checks run before any allocation or delegation, so a failed call
//! leaves every block untouched.

use crate::error::{BlockError, Result};

/// Validates that `[offset, offset + length)` lies within an array of `array_length`.
pub fn check_array_range(array_length: usize, offset: usize, length: usize) -> Result<()> {
    match offset.checked_add(length) {
        Some(end) if end <= array_length => Ok(()),
        _ => Err(BlockError::InvalidArrayRange {
            offset,
            length,
            array_length,
        }),
    }
}

/// Validates that `[position, position + length)` lies within `[0, position_count)`.
pub fn check_valid_region(position_count: usize, position: usize, length: usize) -> Result<()> {
    match position.checked_add(length) {
        Some(end) if end <= position_count => Ok(()),
        _ => Err(BlockError::InvalidRegion {
            position,
            length,
            position_count,
        }),
    }
}

/// Validates that a selection mask covers exactly `position_count` positions.
pub fn check_valid_positions(mask: &[bool], position_count: usize) -> Result<()> {
    if mask.len() != position_count {
        return Err(BlockError::PositionMaskLengthMismatch {
            expected: position_count,
            actual: mask.len(),
        });
    }
    Ok(())
}

/// Validates that `position` can be read from a block of `position_count` rows.
pub fn check_readable_position(position_count: usize, position: usize) -> Result<()> {
    if position >= position_count {
        return Err(BlockError::PositionOutOfRange {
            position,
            position_count,
        });
    }
    Ok(())
}
