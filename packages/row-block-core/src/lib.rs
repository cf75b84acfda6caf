//! Columnar row blocks for a vectorized query engine.
//!
//! Provides struct-typed row storage as one column per field, with
//! zero-copy regions, null-aware gathers, single-row views and byte-size
//! accounting for memory budgeting.

pub mod column;
pub mod config;
pub mod error;
pub mod row;
pub mod shared_array;
pub mod validation;

pub use column::{Column, ColumnRef, FixedWidthColumn, VariableWidthColumn};
pub use config::BlockConfig;
pub use error::{BlockError, Result};
pub use row::{RowBlock, RowLayout, SingleRowBlock};
