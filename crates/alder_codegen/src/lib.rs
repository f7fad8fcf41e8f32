//! alder_codegen: Storage allocation and the target memory image.
//!
//! Code generation is single pass, so the address of a variable is not
//! known when the instructions that use it are emitted: the static-data
//! region starts right after the last instruction. Variables are therefore
//! reserved first and addressed through placeholder tokens, then
//! [`StaticAllocationTable::finalize`] fixes the region and
//! [`backpatch`] substitutes the real addresses.

mod backpatch;
mod error;
mod memory;
mod placeholder;
mod static_table;
mod string_pool;

pub use backpatch::backpatch;
pub use error::CodegenError;
pub use memory::{Address, Cell, MemoryImage, Region, StaticRegion, DEFAULT_CAPACITY, MAX_CAPACITY};
pub use placeholder::{PlaceholderPart, PlaceholderToken};
pub use static_table::{FinalizedSlot, FinalizedStaticTable, ReservedSlot, SlotKey, StaticAllocationTable};
pub use string_pool::StringPool;
