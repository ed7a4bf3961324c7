//! Region-banded storage arena
//!
//! Backs the three storage regions with addressable byte ranges:
//! - stack frames: LIFO, allocations released when their frame is popped
//! - heap: explicit lifetime, `free` marks a tombstone, addresses never reused
//! - static: process lifetime, init-once, no teardown
//!
//! All allocations are zero-initialized, so uninitialized reads are
//! deterministic (zero) rather than undefined. Released blocks are kept as
//! tombstones; touching one raises [`MemoryError::UseAfterFree`], which also
//! serves as the debug guard against reading a popped stack frame.

use crate::errors::MemoryError;
use crate::memory::{
    Address, Location, HEAP_ADDRESS_START, STACK_ADDRESS_START, STATIC_ADDRESS_START,
};
use crate::types::{align_up, Type, TypeTable};
use std::collections::BTreeMap;
use tracing::trace;

/// Storage lifetime category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Stack,
    Heap,
    Static,
}

/// State of an allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    Live,
    Released, // Tombstone: freed heap block or popped stack frame
}

/// A single allocation
#[derive(Debug, Clone)]
struct Block {
    data: Vec<u8>,
    region: Region,
    state: BlockState,
}

impl Block {
    fn size(&self) -> usize {
        self.data.len()
    }
}

/// The arena: every allocation in every region, keyed by base address
#[derive(Debug, Default)]
pub struct Arena {
    blocks: BTreeMap<Address, Block>,
    next_stack: Address,
    next_heap: Address,
    next_static: Address,
    frames: Vec<Vec<Address>>, // Addresses allocated per live stack frame
}

impl Arena {
    pub fn new() -> Self {
        Arena {
            blocks: BTreeMap::new(),
            next_stack: STACK_ADDRESS_START,
            next_heap: HEAP_ADDRESS_START,
            next_static: STATIC_ADDRESS_START,
            frames: Vec::new(),
        }
    }

    /// Enter a new stack frame
    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Exit the current frame, invalidating every allocation made in it
    pub fn pop_frame(&mut self) {
        if let Some(addrs) = self.frames.pop() {
            for addr in addrs {
                if let Some(block) = self.blocks.get_mut(&addr) {
                    block.state = BlockState::Released;
                }
            }
        }
        trace!(depth = self.frames.len(), "popped stack frame");
    }

    /// Depth of the call stack
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Reserve zero-initialized, aligned storage for one value of `ty`
    pub fn allocate(
        &mut self,
        types: &TypeTable,
        region: Region,
        ty: Type,
    ) -> Result<Location, MemoryError> {
        let size = types.size_of(&ty)?;
        let align = types.align_of(&ty)? as Address;
        let addr = self.reserve(region, size, align)?;
        trace!(?region, size, addr, "allocate");
        Ok(Location::new(addr, ty))
    }

    /// Reserve `count` contiguous elements of `elem`
    ///
    /// Element `i` begins at exactly `base + i * sizeof(elem)`; pointer
    /// arithmetic over the array depends on this.
    pub fn allocate_array(
        &mut self,
        types: &TypeTable,
        region: Region,
        elem: Type,
        count: usize,
    ) -> Result<Location, MemoryError> {
        self.allocate(types, region, elem.array_of(count))
    }

    fn reserve(
        &mut self,
        region: Region,
        size: usize,
        align: Address,
    ) -> Result<Address, MemoryError> {
        let cursor = match region {
            Region::Stack => {
                if self.frames.is_empty() {
                    return Err(MemoryError::NoStackFrame);
                }
                &mut self.next_stack
            }
            Region::Heap => &mut self.next_heap,
            Region::Static => &mut self.next_static,
        };
        let addr = align_up(*cursor as usize, align as usize) as Address;
        *cursor = addr + size as Address;

        self.blocks.insert(
            addr,
            Block {
                data: vec![0; size],
                region,
                state: BlockState::Live,
            },
        );
        if region == Region::Stack {
            // Checked above: at least one frame is live
            if let Some(frame) = self.frames.last_mut() {
                frame.push(addr);
            }
        }
        Ok(addr)
    }

    /// Release a heap allocation
    ///
    /// The block becomes a tombstone: the address is never reused and any
    /// later access raises `UseAfterFree`.
    pub fn free(&mut self, loc: &Location) -> Result<(), MemoryError> {
        let addr = loc.addr();
        let block = self
            .blocks
            .get_mut(&addr)
            .ok_or(MemoryError::InvalidFree { address: addr })?;
        if block.region != Region::Heap {
            return Err(MemoryError::InvalidFree { address: addr });
        }
        if block.state == BlockState::Released {
            return Err(MemoryError::DoubleFree { address: addr });
        }
        block.state = BlockState::Released;
        trace!(addr, "free");
        Ok(())
    }

    /// Find the live block containing `addr`
    fn block_containing(&self, addr: Address) -> Result<(Address, &Block), MemoryError> {
        let (&base, block) = self
            .blocks
            .range(..=addr)
            .next_back()
            .ok_or(MemoryError::InvalidPointer { address: addr })?;
        if addr >= base + block.size() as Address {
            return Err(MemoryError::InvalidPointer { address: addr });
        }
        if block.state == BlockState::Released {
            return Err(MemoryError::UseAfterFree { address: addr });
        }
        Ok((base, block))
    }

    /// Read `len` bytes starting at `addr`
    pub fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let (base, block) = self.block_containing(addr)?;
        let offset = (addr - base) as usize;
        if offset + len > block.size() {
            return Err(MemoryError::BufferOverrun {
                offset,
                len,
                size: block.size(),
            });
        }
        Ok(block.data[offset..offset + len].to_vec())
    }

    /// Write bytes starting at `addr`
    pub fn write_bytes(&mut self, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        let (base, block) = self.block_containing(addr)?;
        let (offset, size) = ((addr - base) as usize, block.size());
        if offset + bytes.len() > size {
            return Err(MemoryError::BufferOverrun {
                offset,
                len: bytes.len(),
                size,
            });
        }
        // Re-borrow mutably; block_containing proved the block is live
        if let Some(block) = self.blocks.get_mut(&base) {
            block.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        }
        Ok(())
    }

    /// Rebuild a typed Location from a raw address (pointer dereference)
    pub fn locate(
        &self,
        types: &TypeTable,
        addr: Address,
        ty: Type,
    ) -> Result<Location, MemoryError> {
        let size = types.size_of(&ty)?;
        let (base, block) = self.block_containing(addr)?;
        let offset = addr - base;
        if offset as usize + size > block.size() {
            return Err(MemoryError::BufferOverrun {
                offset: offset as usize,
                len: size,
                size: block.size(),
            });
        }
        Ok(Location { base, offset, ty })
    }

    /// View an existing span under a new type without copying
    ///
    /// The new type must fit inside the owning allocation's bound; this is
    /// the checked form of a C pointer cast.
    pub fn reinterpret(
        &self,
        types: &TypeTable,
        loc: &Location,
        ty: Type,
    ) -> Result<Location, MemoryError> {
        let size = types.size_of(&ty)?;
        let block = self
            .blocks
            .get(&loc.base)
            .ok_or(MemoryError::InvalidPointer { address: loc.base })?;
        if block.state == BlockState::Released {
            return Err(MemoryError::UseAfterFree { address: loc.base });
        }
        if loc.offset as usize + size > block.size() {
            return Err(MemoryError::BufferOverrun {
                offset: loc.offset as usize,
                len: size,
                size: block.size(),
            });
        }
        Ok(Location {
            base: loc.base,
            offset: loc.offset,
            ty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_table() -> TypeTable {
        let mut types = TypeTable::new();
        types
            .define_struct("Point", vec![("x", Type::Int), ("y", Type::Int)])
            .unwrap();
        types
    }

    #[test]
    fn allocations_are_zero_initialized() {
        let types = point_table();
        let mut arena = Arena::new();
        let loc = arena
            .allocate(&types, Region::Static, Type::Struct("Point".into()))
            .unwrap();
        assert_eq!(arena.read_bytes(loc.addr(), 8).unwrap(), vec![0; 8]);
    }

    #[test]
    fn array_elements_are_contiguous() {
        let types = point_table();
        let mut arena = Arena::new();
        let arr = arena
            .allocate_array(&types, Region::Heap, Type::Struct("Point".into()), 3)
            .unwrap();
        for i in 0..3 {
            let elem = arr.index(&types, i).unwrap();
            assert_eq!(elem.addr(), arr.addr() + i as u64 * 8);
        }
    }

    #[test]
    fn stack_allocation_requires_a_frame() {
        let types = point_table();
        let mut arena = Arena::new();
        assert!(matches!(
            arena.allocate(&types, Region::Stack, Type::Int),
            Err(MemoryError::NoStackFrame)
        ));
    }

    #[test]
    fn popped_frame_storage_is_released() {
        let types = point_table();
        let mut arena = Arena::new();
        arena.push_frame();
        let loc = arena.allocate(&types, Region::Stack, Type::Int).unwrap();
        assert!(arena.read_bytes(loc.addr(), 4).is_ok());
        arena.pop_frame();
        assert!(matches!(
            arena.read_bytes(loc.addr(), 4),
            Err(MemoryError::UseAfterFree { .. })
        ));
    }

    #[test]
    fn freed_heap_block_is_a_tombstone() {
        let types = point_table();
        let mut arena = Arena::new();
        let loc = arena.allocate(&types, Region::Heap, Type::Int).unwrap();
        arena.free(&loc).unwrap();
        assert!(matches!(
            arena.read_bytes(loc.addr(), 4),
            Err(MemoryError::UseAfterFree { .. })
        ));
        assert!(matches!(
            arena.free(&loc),
            Err(MemoryError::DoubleFree { .. })
        ));
    }

    #[test]
    fn freeing_non_heap_storage_is_invalid() {
        let types = point_table();
        let mut arena = Arena::new();
        let loc = arena.allocate(&types, Region::Static, Type::Int).unwrap();
        assert!(matches!(
            arena.free(&loc),
            Err(MemoryError::InvalidFree { .. })
        ));
    }

    #[test]
    fn out_of_band_access_is_rejected() {
        let types = point_table();
        let mut arena = Arena::new();
        let loc = arena.allocate(&types, Region::Heap, Type::Int).unwrap();
        assert!(matches!(
            arena.read_bytes(loc.addr(), 8),
            Err(MemoryError::BufferOverrun { .. })
        ));
        assert!(matches!(
            arena.read_bytes(0xdead_0000, 1),
            Err(MemoryError::InvalidPointer { .. })
        ));
    }

    #[test]
    fn reinterpret_is_bounded_by_the_allocation() {
        let types = point_table();
        let mut arena = Arena::new();
        let point = Type::Struct("Point".into());
        let raw = arena
            .allocate_array(&types, Region::Heap, Type::Char, 8)
            .unwrap();
        let as_point = arena.reinterpret(&types, &raw, point.clone()).unwrap();
        assert_eq!(as_point.addr(), raw.addr());
        // Two Points do not fit in 8 bytes
        assert!(matches!(
            arena.reinterpret(&types, &raw, point.array_of(2)),
            Err(MemoryError::BufferOverrun { .. })
        ));
    }

    #[test]
    fn regions_occupy_distinct_address_bands() {
        let types = point_table();
        let mut arena = Arena::new();
        arena.push_frame();
        let s = arena.allocate(&types, Region::Stack, Type::Int).unwrap();
        let h = arena.allocate(&types, Region::Heap, Type::Int).unwrap();
        let g = arena.allocate(&types, Region::Static, Type::Int).unwrap();
        assert!(g.addr() < s.addr());
        assert!(s.addr() < h.addr());
    }
}
