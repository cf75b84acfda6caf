//! Row blocks: struct-typed rows stored as one column per field.

mod extract;
mod gather;
mod layout;
mod region;
mod row_block;
mod single_row;
mod size;

pub use layout::RowLayout;
pub use row_block::RowBlock;
pub use single_row::SingleRowBlock;
pub use size::ROW_OVERHEAD_BYTES;

/// Encoding tag of row blocks.
pub const ROW_ENCODING: &str = "ROW";
