//! One program's code generation state.

use alder_codegen::{
    backpatch, Address, CodegenError, FinalizedStaticTable, MemoryImage, PlaceholderToken,
    StaticAllocationTable,
};
use alder_tree::NodeId;

/// Owns the memory image and static table for one program while its code
/// is emitted.
#[derive(Debug)]
pub struct CodegenSession {
    memory: MemoryImage,
    statics: StaticAllocationTable,
}

/// A fully addressed program image.
#[derive(Debug)]
pub struct CompiledImage {
    pub memory: MemoryImage,
    pub statics: FinalizedStaticTable,
    /// Placeholder cells replaced during backpatching.
    pub patched_cells: usize,
}

impl CompiledImage {
    /// The image as rows of two-hex-digit cells.
    pub fn to_hex_string(&self) -> String {
        self.memory.to_hex_string()
    }
}

impl CodegenSession {
    pub fn new(capacity: usize) -> Result<Self, CodegenError> {
        Ok(Self {
            memory: MemoryImage::new(capacity)?,
            statics: StaticAllocationTable::new(),
        })
    }

    /// Append instruction bytes.
    pub fn emit(&mut self, bytes: &[u8]) -> Result<Address, CodegenError> {
        self.memory.emit_code(bytes)
    }

    /// Append the placeholder address of a reserved slot.
    pub fn emit_slot(&mut self, token: PlaceholderToken) -> Result<Address, CodegenError> {
        self.memory.emit_placeholder(token)
    }

    /// Reserve storage for a declared variable.
    pub fn reserve(&mut self, identifier: &str, scope: NodeId) -> Result<PlaceholderToken, CodegenError> {
        self.statics
            .reserve(identifier, scope, &mut self.memory)
            .map(|slot| slot.placeholder())
    }

    /// Reserve storage for a compiler temporary.
    pub fn reserve_anonymous(&mut self) -> Result<PlaceholderToken, CodegenError> {
        self.statics
            .reserve_anonymous(&mut self.memory)
            .map(|slot| slot.placeholder())
    }

    /// The token reserved for `identifier` in its declaring scope.
    pub fn slot(&self, identifier: &str, scope: NodeId) -> Option<PlaceholderToken> {
        self.statics.get(identifier, scope).map(|slot| slot.placeholder())
    }

    pub fn intern_string(&mut self, text: &str) -> Result<Address, CodegenError> {
        self.statics.intern_string(text, &mut self.memory)
    }

    pub fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    pub fn statics(&self) -> &StaticAllocationTable {
        &self.statics
    }

    /// Place the static region after the code and backpatch every
    /// placeholder. Seals the image.
    pub fn finish(self) -> Result<CompiledImage, CodegenError> {
        let mut memory = self.memory;
        let statics = self.statics.finalize(&mut memory)?;
        let patched_cells = backpatch(&mut memory, &statics)?;
        tracing::debug!(
            code = memory.code_pointer(),
            statics = statics.size(),
            heap_pointer = memory.heap_pointer(),
            patched_cells,
            "program image complete"
        );
        Ok(CompiledImage {
            memory,
            statics,
            patched_cells,
        })
    }
}
