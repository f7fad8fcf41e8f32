//! The fixed-size target memory image.
//!
//! Three regions share the image:
//! - code, from cell 0 upward (`code_pointer` is the next free cell)
//! - static data, placed directly after the final instruction
//! - heap, from the last cell downward (`heap_pointer` is the next free cell)
//!
//! At all times `code_pointer + static_size <= heap_pointer`. An operation
//! that would break this fails with [`CodegenError::OutOfMemory`] and leaves
//! the image untouched.

use crate::error::CodegenError;
use crate::placeholder::{PlaceholderPart, PlaceholderToken};
use crate::static_table::FinalizedSlot;
use std::fmt;

/// A target address.
pub type Address = u16;

/// Capacity of the reference machine image.
pub const DEFAULT_CAPACITY: usize = 256;
/// Largest image addressable with a two-byte address.
pub const MAX_CAPACITY: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Code,
    Static,
    Heap,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Code => "code",
            Region::Static => "static",
            Region::Heap => "heap",
        })
    }
}

/// One byte-cell of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Byte(u8),
    /// Half of an address not yet known.
    Placeholder(PlaceholderPart),
}

impl Cell {
    pub const ZERO: Cell = Cell::Byte(0);
}

impl Default for Cell {
    fn default() -> Self {
        Cell::ZERO
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Byte(byte) => write!(f, "{:02X}", byte),
            Cell::Placeholder(part) => fmt::Display::fmt(part, f),
        }
    }
}

/// Where the static-data region ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRegion {
    pub base: usize,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct MemoryImage {
    cells: Vec<Cell>,
    code_pointer: usize,
    heap_pointer: usize,
    /// Cells promised to the static region (reserved or placed).
    static_size: usize,
    static_region: Option<StaticRegion>,
}

impl MemoryImage {
    pub fn new(capacity: usize) -> Result<Self, CodegenError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(CodegenError::InvalidCapacity { capacity });
        }
        Ok(Self::zeroed(capacity))
    }

    /// `capacity` must already be in range.
    fn zeroed(capacity: usize) -> Self {
        Self {
            cells: vec![Cell::ZERO; capacity],
            code_pointer: 0,
            heap_pointer: capacity - 1,
            static_size: 0,
            static_region: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn code_pointer(&self) -> usize {
        self.code_pointer
    }

    pub fn heap_pointer(&self) -> usize {
        self.heap_pointer
    }

    pub fn static_size(&self) -> usize {
        self.static_size
    }

    pub fn static_region(&self) -> Option<StaticRegion> {
        self.static_region
    }

    /// Start of the runtime stack; defined once the static region is placed.
    pub fn stack_pointer(&self) -> Option<usize> {
        self.static_region.map(|region| region.base)
    }

    /// Cells not claimed by any region.
    pub fn free_cells(&self) -> usize {
        // heap_pointer itself is free, hence the +1.
        (self.heap_pointer + 1).saturating_sub(self.code_pointer + self.static_size)
    }

    pub fn used_cells(&self) -> usize {
        self.capacity() - self.free_cells()
    }

    pub fn cell(&self, address: usize) -> Option<Cell> {
        self.cells.get(address).copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check that `requested` more cells can join `region` while keeping one
    /// cell between the growing ends.
    fn ensure_room(&self, region: Region, requested: usize) -> Result<(), CodegenError> {
        if self.code_pointer + self.static_size + requested > self.heap_pointer {
            return Err(self.out_of_memory(region, requested));
        }
        Ok(())
    }

    fn out_of_memory(&self, region: Region, requested: usize) -> CodegenError {
        tracing::warn!(
            %region,
            requested,
            code_pointer = self.code_pointer,
            static_size = self.static_size,
            heap_pointer = self.heap_pointer,
            "memory image exhausted"
        );
        CodegenError::OutOfMemory {
            region,
            requested,
            code_pointer: self.code_pointer,
            static_size: self.static_size,
            heap_pointer: self.heap_pointer,
        }
    }

    fn ensure_code_open(&self) -> Result<(), CodegenError> {
        if self.static_region.is_some() {
            return Err(CodegenError::CodeRegionSealed {
                code_pointer: self.code_pointer,
            });
        }
        Ok(())
    }

    /// Append one instruction byte to the code region.
    pub fn emit_code_byte(&mut self, value: u8) -> Result<Address, CodegenError> {
        self.emit_cells(&[Cell::Byte(value)])
    }

    /// Append instruction bytes; all or nothing.
    pub fn emit_code(&mut self, bytes: &[u8]) -> Result<Address, CodegenError> {
        let cells: Vec<Cell> = bytes.iter().map(|&b| Cell::Byte(b)).collect();
        self.emit_cells(&cells)
    }

    /// Append a two-cell placeholder address for a reserved slot.
    pub fn emit_placeholder(&mut self, token: PlaceholderToken) -> Result<Address, CodegenError> {
        let [leading, trailing] = token.parts();
        self.emit_cells(&[Cell::Placeholder(leading), Cell::Placeholder(trailing)])
    }

    /// Returns the address of the first cell written.
    fn emit_cells(&mut self, cells: &[Cell]) -> Result<Address, CodegenError> {
        self.ensure_code_open()?;
        self.ensure_room(Region::Code, cells.len())?;
        let start = self.code_pointer;
        self.cells[start..start + cells.len()].copy_from_slice(cells);
        self.code_pointer += cells.len();
        Ok(start as Address)
    }

    /// Write one cell at the heap end and retreat the heap pointer.
    pub fn allocate_heap_cell(&mut self, value: u8) -> Result<Address, CodegenError> {
        self.ensure_room(Region::Heap, 1)?;
        let address = self.heap_pointer;
        self.cells[address] = Cell::Byte(value);
        self.heap_pointer -= 1;
        Ok(address as Address)
    }

    /// Store `bytes` NUL-terminated on the heap, readable upward from the
    /// returned address.
    pub fn allocate_heap_string(&mut self, bytes: &[u8]) -> Result<Address, CodegenError> {
        self.ensure_room(Region::Heap, bytes.len() + 1)?;
        let mut start = self.allocate_heap_cell(0x00)?;
        for &byte in bytes.iter().rev() {
            start = self.allocate_heap_cell(byte)?;
        }
        Ok(start)
    }

    /// Promise one more cell to the static region before it is placed.
    pub fn reserve_static_cell(&mut self) -> Result<(), CodegenError> {
        if self.static_region.is_some() {
            return Err(CodegenError::StaticRegionAlreadyPlaced);
        }
        self.ensure_room(Region::Static, 1)?;
        self.static_size += 1;
        Ok(())
    }

    /// Place the static region right after the final instruction. Seals the
    /// code region.
    pub fn finalize_stack_region(&mut self, size: usize) -> Result<StaticRegion, CodegenError> {
        if self.static_region.is_some() {
            return Err(CodegenError::StaticRegionAlreadyPlaced);
        }
        if self.code_pointer + size > self.heap_pointer {
            return Err(self.out_of_memory(Region::Static, size));
        }
        let region = StaticRegion {
            base: self.code_pointer,
            size,
        };
        self.static_size = size;
        self.static_region = Some(region);
        tracing::debug!(base = region.base, size, "placed static region");
        Ok(region)
    }

    /// Write `value` at `logical` within the placed static region.
    pub fn write_static(&mut self, logical: Address, value: u8) -> Result<Address, CodegenError> {
        let region = self.static_region.ok_or(CodegenError::StaticRegionNotPlaced)?;
        if usize::from(logical) >= region.size {
            return Err(CodegenError::StaticOutOfBounds {
                logical,
                size: region.size,
            });
        }
        let address = region.base + usize::from(logical);
        self.cells[address] = Cell::Byte(value);
        Ok(address as Address)
    }

    /// Write the initial value of a finalized slot.
    pub fn write_slot(&mut self, slot: &FinalizedSlot, value: u8) -> Result<Address, CodegenError> {
        self.write_static(slot.logical_stack_address(), value)
    }

    /// Overwrite a code cell, used when backpatching.
    pub(crate) fn patch_code(&mut self, address: usize, value: u8) {
        debug_assert!(address < self.code_pointer);
        self.cells[address] = Cell::Byte(value);
    }

    /// Placeholder cells still present in the code region.
    pub fn placeholders(&self) -> impl Iterator<Item = (usize, PlaceholderPart)> + '_ {
        self.cells[..self.code_pointer]
            .iter()
            .enumerate()
            .filter_map(|(address, cell)| match cell {
                Cell::Placeholder(part) => Some((address, *part)),
                Cell::Byte(_) => None,
            })
    }

    /// The image as two-hex-digit cells, eight per line.
    pub fn to_hex_string(&self) -> String {
        self.cells
            .chunks(8)
            .map(|row| {
                row.iter()
                    .map(Cell::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::zeroed(DEFAULT_CAPACITY)
    }
}
