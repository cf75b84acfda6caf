//! Block construction configuration.

use serde::{Deserialize, Serialize};

/// Checks applied when a row block is built from caller supplied parts.
///
/// Blocks derived from existing blocks (regions, gathers, copies) skip
/// these checks since their invariants hold by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    /// Check that every visible row spans one field entry, or none when null.
    /// Monotonicity and the end bound are always checked.
    pub verify_offsets: bool,
    /// Drop a null mask that marks no visible row as null
    pub canonicalize_null_mask: bool,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            verify_offsets: true,
            canonicalize_null_mask: true,
        }
    }
}
