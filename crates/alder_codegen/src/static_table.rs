//! Two-phase static storage allocation.
//!
//! While code is emitted, [`StaticAllocationTable`] hands out slots whose
//! address is only a [`PlaceholderToken`]. Once the code region has its final
//! size, [`StaticAllocationTable::finalize`] consumes the table, places the
//! static region, and returns a [`FinalizedStaticTable`] whose slots carry
//! real addresses. Reserving after finalization cannot be expressed.

use crate::error::CodegenError;
use crate::memory::{Address, MemoryImage};
use crate::placeholder::PlaceholderToken;
use crate::string_pool::StringPool;
use alder_tree::NodeId;
use rustc_hash::FxHashMap;

/// The identity of a named slot: an identifier within its declaring scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub identifier: String,
    pub scope: NodeId,
}

/// Named-slot index: scope, then identifier, to allocation ordinal.
type NamedIndex = FxHashMap<NodeId, FxHashMap<String, u32>>;

fn lookup(named: &NamedIndex, identifier: &str, scope: NodeId) -> Option<usize> {
    named.get(&scope)?.get(identifier).map(|&ordinal| ordinal as usize)
}

/// A slot whose address is not known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedSlot {
    ordinal: u32,
    key: Option<SlotKey>,
}

impl ReservedSlot {
    /// Position in allocation order, shared by named and anonymous slots.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn key(&self) -> Option<&SlotKey> {
        self.key.as_ref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.key.is_none()
    }

    pub fn placeholder(&self) -> PlaceholderToken {
        PlaceholderToken::new(self.ordinal)
    }

    pub fn is_usable(&self) -> bool {
        false
    }
}

/// A slot with its final location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedSlot {
    ordinal: u32,
    key: Option<SlotKey>,
    logical_stack_address: Address,
    address: Address,
}

impl FinalizedSlot {
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn key(&self) -> Option<&SlotKey> {
        self.key.as_ref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.key.is_none()
    }

    /// The token that was emitted for this slot before finalization.
    pub fn placeholder(&self) -> PlaceholderToken {
        PlaceholderToken::new(self.ordinal)
    }

    /// Offset from the start of the static region.
    pub fn logical_stack_address(&self) -> Address {
        self.logical_stack_address
    }

    /// Absolute address in the memory image.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn is_usable(&self) -> bool {
        true
    }
}

/// Static storage during code emission.
#[derive(Debug, Default)]
pub struct StaticAllocationTable {
    /// All slots in allocation order; index == ordinal.
    slots: Vec<ReservedSlot>,
    named: NamedIndex,
    anonymous: Vec<u32>,
    strings: StringPool,
}

impl StaticAllocationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot for `identifier` declared in `scope`.
    ///
    /// Fails with [`CodegenError::Redeclared`] if that pair already has a
    /// slot, or with an out-of-memory error if the static region can no
    /// longer grow. Nothing changes on failure.
    pub fn reserve(
        &mut self,
        identifier: &str,
        scope: NodeId,
        memory: &mut MemoryImage,
    ) -> Result<&ReservedSlot, CodegenError> {
        if lookup(&self.named, identifier, scope).is_some() {
            return Err(CodegenError::Redeclared {
                identifier: identifier.to_string(),
                scope,
            });
        }
        memory.reserve_static_cell()?;
        let ordinal = self.slots.len() as u32;
        self.named
            .entry(scope)
            .or_default()
            .insert(identifier.to_string(), ordinal);
        tracing::debug!(identifier, scope = scope.0, ordinal, "reserved static slot");
        Ok(self.push(Some(SlotKey {
            identifier: identifier.to_string(),
            scope,
        })))
    }

    /// Reserve an unnamed slot for a compiler temporary.
    pub fn reserve_anonymous(&mut self, memory: &mut MemoryImage) -> Result<&ReservedSlot, CodegenError> {
        memory.reserve_static_cell()?;
        let ordinal = self.slots.len() as u32;
        self.anonymous.push(ordinal);
        tracing::debug!(ordinal, "reserved anonymous slot");
        Ok(self.push(None))
    }

    fn push(&mut self, key: Option<SlotKey>) -> &ReservedSlot {
        let ordinal = self.slots.len() as u32;
        self.slots.push(ReservedSlot { ordinal, key });
        &self.slots[ordinal as usize]
    }

    pub fn get(&self, identifier: &str, scope: NodeId) -> Option<&ReservedSlot> {
        lookup(&self.named, identifier, scope).map(|ordinal| &self.slots[ordinal])
    }

    /// The `index`-th anonymous slot, in reservation order.
    pub fn anonymous(&self, index: usize) -> Option<&ReservedSlot> {
        let ordinal = *self.anonymous.get(index)?;
        self.slots.get(ordinal as usize)
    }

    /// All slots in allocation order.
    pub fn slots(&self) -> &[ReservedSlot] {
        &self.slots
    }

    pub fn named_count(&self) -> usize {
        self.slots.len() - self.anonymous.len()
    }

    pub fn anonymous_count(&self) -> usize {
        self.anonymous.len()
    }

    /// Named plus anonymous slots: the size of the static region.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Heap address of a string literal, storing it on first use.
    pub fn intern_string(&mut self, text: &str, memory: &mut MemoryImage) -> Result<Address, CodegenError> {
        self.strings.intern(text, memory)
    }

    pub fn string_address(&self, text: &str) -> Option<Address> {
        self.strings.address_of(text)
    }

    pub fn strings(&self) -> &StringPool {
        &self.strings
    }

    /// Place the static region after the final instruction and give every
    /// slot its address, in allocation order.
    pub fn finalize(self, memory: &mut MemoryImage) -> Result<FinalizedStaticTable, CodegenError> {
        let region = memory.finalize_stack_region(self.size())?;
        let slots: Vec<FinalizedSlot> = self
            .slots
            .into_iter()
            .map(|slot| {
                let logical = slot.ordinal as Address;
                FinalizedSlot {
                    ordinal: slot.ordinal,
                    key: slot.key,
                    logical_stack_address: logical,
                    address: (region.base + usize::from(logical)) as Address,
                }
            })
            .collect();
        tracing::debug!(
            base = region.base,
            slots = slots.len(),
            strings = self.strings.len(),
            "finalized static table"
        );
        Ok(FinalizedStaticTable {
            slots,
            named: self.named,
            anonymous: self.anonymous,
            strings: self.strings,
            base: region.base,
        })
    }
}

/// Static storage with final addresses, ready for backpatching.
#[derive(Debug)]
pub struct FinalizedStaticTable {
    slots: Vec<FinalizedSlot>,
    named: NamedIndex,
    anonymous: Vec<u32>,
    strings: StringPool,
    base: usize,
}

impl FinalizedStaticTable {
    pub fn get(&self, identifier: &str, scope: NodeId) -> Option<&FinalizedSlot> {
        lookup(&self.named, identifier, scope).map(|ordinal| &self.slots[ordinal])
    }

    pub fn anonymous(&self, index: usize) -> Option<&FinalizedSlot> {
        let ordinal = *self.anonymous.get(index)?;
        self.slots.get(ordinal as usize)
    }

    /// The slot a placeholder with this ordinal stands for.
    pub fn slot(&self, ordinal: u32) -> Option<&FinalizedSlot> {
        self.slots.get(ordinal as usize)
    }

    pub fn slots(&self) -> &[FinalizedSlot] {
        &self.slots
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Address of the first static cell.
    pub fn base(&self) -> usize {
        self.base
    }

    pub fn string_address(&self, text: &str) -> Option<Address> {
        self.strings.address_of(text)
    }

    pub fn strings(&self) -> &StringPool {
        &self.strings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_named_and_lookup() {
        let mut memory = MemoryImage::default();
        let mut table = StaticAllocationTable::new();
        let slot = table.reserve("a", NodeId(0), &mut memory).unwrap();
        assert_eq!(slot.placeholder().to_string(), "T0XX");
        assert!(!slot.is_usable());
        assert_eq!(table.get("a", NodeId(0)).unwrap().ordinal(), 0);
        assert!(table.get("a", NodeId(1)).is_none());
        assert_eq!(memory.static_size(), 1);
    }

    #[test]
    fn test_redeclared_key_rejected_without_effect() {
        let mut memory = MemoryImage::default();
        let mut table = StaticAllocationTable::new();
        table.reserve("a", NodeId(0), &mut memory).unwrap();
        let err = table.reserve("a", NodeId(0), &mut memory).unwrap_err();
        assert_eq!(
            err,
            CodegenError::Redeclared {
                identifier: "a".into(),
                scope: NodeId(0)
            }
        );
        assert_eq!(table.size(), 1);
        assert_eq!(memory.static_size(), 1);
        // Same name in another scope is a different slot.
        assert_eq!(table.reserve("a", NodeId(3), &mut memory).unwrap().ordinal(), 1);
    }

    #[test]
    fn test_reserve_out_of_memory_leaves_table_unchanged() {
        let mut memory = MemoryImage::new(2).unwrap();
        let mut table = StaticAllocationTable::new();
        table.reserve_anonymous(&mut memory).unwrap();
        assert!(matches!(
            table.reserve("b", NodeId(0), &mut memory),
            Err(CodegenError::OutOfMemory { .. })
        ));
        assert_eq!(table.size(), 1);
        assert!(table.get("b", NodeId(0)).is_none());
    }
}
