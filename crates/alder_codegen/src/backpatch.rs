//! Substitution of placeholder addresses after finalization.

use crate::error::CodegenError;
use crate::memory::MemoryImage;
use crate::static_table::FinalizedStaticTable;

/// Replace every placeholder in the code region with the address of the
/// slot it names. Returns the number of cells patched.
///
/// All placeholders are checked before any cell is written, so an unknown
/// slot leaves the image untouched.
pub fn backpatch(memory: &mut MemoryImage, table: &FinalizedStaticTable) -> Result<usize, CodegenError> {
    let patches = memory
        .placeholders()
        .map(|(location, part)| -> Result<(usize, u8), CodegenError> {
            let slot = table
                .slot(part.ordinal())
                .ok_or(CodegenError::UnknownSlot {
                    ordinal: part.ordinal(),
                    location,
                })?;
            Ok((location, part.resolve(slot.address())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for &(location, byte) in &patches {
        memory.patch_code(location, byte);
    }
    tracing::debug!(patched = patches.len(), "backpatched placeholders");
    Ok(patches.len())
}
