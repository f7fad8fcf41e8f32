//! Deduplicated string literal storage.

use crate::error::CodegenError;
use crate::memory::{Address, MemoryImage};
use alder_core::intern::StringInterner;

/// Maps literal content to its heap address. Each distinct literal is
/// stored at most once per program.
#[derive(Debug, Default)]
pub struct StringPool {
    interner: StringInterner,
    /// Indexed by interned key.
    addresses: Vec<Address>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heap address of `text`, storing it on first sight.
    pub fn intern(&mut self, text: &str, memory: &mut MemoryImage) -> Result<Address, CodegenError> {
        if let Some(address) = self.address_of(text) {
            return Ok(address);
        }
        // Allocate before interning so a failed allocation leaves no entry.
        let address = memory.allocate_heap_string(text.as_bytes())?;
        let key = self.interner.intern(text);
        debug_assert_eq!(key.index(), self.addresses.len());
        self.addresses.push(address);
        tracing::debug!(literal = text, address, "stored string literal");
        Ok(address)
    }

    pub fn address_of(&self, text: &str) -> Option<Address> {
        let key = self.interner.get(text)?;
        self.addresses.get(key.index()).copied()
    }

    /// Stored literals with their addresses, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> + '_ {
        self.addresses.iter().enumerate().filter_map(move |(index, &address)| {
            let text = self.interner.get_by_index(index)?;
            Some((text, address))
        })
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
