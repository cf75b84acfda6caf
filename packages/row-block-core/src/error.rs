//! Block error types.

use thiserror::Error;

/// Row block operation errors.
///
/// Every variant describes an invalid argument: a position, range, mask or
/// construction parameter that breaks the caller's side of the contract.
/// None of them are transient, so there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Position outside `[0, position_count)`
    #[error("Position {position} is not valid (position count: {position_count})")]
    PositionOutOfRange {
        position: usize,
        position_count: usize,
    },

    /// Region not contained in `[0, position_count)`
    #[error("Invalid region position={position} length={length} (position count: {position_count})")]
    InvalidRegion {
        position: usize,
        length: usize,
        position_count: usize,
    },

    /// Sub-range of a caller supplied array is out of bounds
    #[error("Invalid array range offset={offset} length={length} (array length: {array_length})")]
    InvalidArrayRange {
        offset: usize,
        length: usize,
        array_length: usize,
    },

    /// Selection mask does not cover exactly the block's positions
    #[error("Position mask length {actual} does not match position count {expected}")]
    PositionMaskLengthMismatch { expected: usize, actual: usize },

    /// Row blocks need at least one field
    #[error("Number of fields in a row block must be positive")]
    NoFields,

    /// Field columns disagree on their length
    #[error("Field column {field} has length {actual}, expected {expected}")]
    FieldLengthMismatch {
        field: usize,
        expected: usize,
        actual: usize,
    },

    /// Malformed field offsets array
    #[error("Invalid field offsets: {0}")]
    InvalidOffsets(String),

    /// Null mask too short for the addressed rows
    #[error("Null mask length {actual} is smaller than required {required}")]
    InvalidNullMask { required: usize, actual: usize },

    /// Single-row view requested from a column that does not hold rows
    #[error("Column with encoding '{encoding}' is not a row column")]
    NotARowColumn { encoding: &'static str },
}

impl BlockError {
    /// Returns `true` for every variant; all block errors are invalid arguments.
    pub fn is_invalid_argument(&self) -> bool {
        true
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BlockError>;
