//! Code generation errors.

use crate::memory::{Address, Region};
use alder_tree::NodeId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// The regions would collide. Terminal for the program being compiled.
    #[error(
        "out of memory growing the {region} region by {requested} cell(s) \
         (code pointer {code_pointer:#06x}, static size {static_size}, heap pointer {heap_pointer:#06x})"
    )]
    OutOfMemory {
        region: Region,
        requested: usize,
        code_pointer: usize,
        static_size: usize,
        heap_pointer: usize,
    },

    #[error("'{identifier}' already has storage in scope {scope}")]
    Redeclared { identifier: String, scope: NodeId },

    #[error("code region is sealed at {code_pointer:#06x}; the static region has been placed after it")]
    CodeRegionSealed { code_pointer: usize },

    #[error("the static region has already been placed")]
    StaticRegionAlreadyPlaced,

    #[error("the static region has not been placed yet")]
    StaticRegionNotPlaced,

    #[error("static slot {logical} is outside the {size}-cell static region")]
    StaticOutOfBounds { logical: Address, size: usize },

    #[error("placeholder at {location:#06x} refers to unknown slot T{ordinal}")]
    UnknownSlot { ordinal: u32, location: usize },

    #[error("memory capacity must be between 1 and 65536 cells, got {capacity}")]
    InvalidCapacity { capacity: usize },
}
