//! Memory model for the value-semantics engine
//!
//! This module provides the core memory abstractions:
//! - [`arena`]: region-banded block storage (stack frames, heap, statics)
//! - [`location`]: typed lvalue references into that storage
//! - [`copy`]: the aggregate copy engine and scalar accessors
//!
//! # Pointer Arithmetic
//!
//! Pointer arithmetic is scaled by pointee size:
//! ```text
//! ptr + n  →  ptr + (n * sizeof(*ptr))
//! ```
//!
//! [`pointer_add`] and [`pointer_diff`] handle this scaling. The invariant
//! the whole suite exists to check is that `pointer_add(base, i)` always
//! equals the address of element `i` obtained by indexing.

pub mod arena;
pub mod copy;
pub mod location;

pub use arena::{Arena, Region};
pub use location::Location;

use crate::errors::MemoryError;
use crate::types::{Type, TypeTable};

/// Memory address type (64-bit)
pub type Address = u64;

/// Starting address for static storage
pub const STATIC_ADDRESS_START: Address = 0x0000_1000;

/// Starting address for stack frame storage
pub const STACK_ADDRESS_START: Address = 0x0010_0000;

/// Starting address for heap allocations
/// Heap addresses start high to clearly distinguish them from stack addresses
pub const HEAP_ADDRESS_START: Address = 0x1000_0000;

/// Perform pointer arithmetic: addr + offset (scaled by pointee size)
pub fn pointer_add(
    types: &TypeTable,
    addr: Address,
    offset: i64,
    pointee: &Type,
) -> Result<Address, MemoryError> {
    let stride = types.size_of(pointee)? as i64;
    Ok((addr as i64 + offset * stride) as Address)
}

/// Calculate the difference between two pointers (in elements, not bytes)
pub fn pointer_diff(
    types: &TypeTable,
    addr1: Address,
    addr2: Address,
    pointee: &Type,
) -> Result<i64, MemoryError> {
    let stride = types.size_of(pointee)? as i64;
    Ok((addr1 as i64 - addr2 as i64) / stride)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_add_scales_by_pointee_size() {
        let mut types = TypeTable::new();
        types
            .define_struct("Point", vec![("x", Type::Int), ("y", Type::Int)])
            .unwrap();

        let base = 0x1000_0000;
        let point = Type::Struct("Point".into());
        assert_eq!(pointer_add(&types, base, 2, &point).unwrap(), base + 16);
        assert_eq!(pointer_add(&types, base, 0, &point).unwrap(), base);
        assert_eq!(pointer_add(&types, base + 16, -1, &point).unwrap(), base + 8);
        // Pointer-to-pointer advances by the pointer's own size
        let pp = point.pointer_to();
        assert_eq!(pointer_add(&types, base, 3, &pp).unwrap(), base + 24);
    }

    #[test]
    fn pointer_diff_inverts_pointer_add() {
        let types = TypeTable::new();
        let base = 0x2000;
        let fourth = pointer_add(&types, base, 4, &Type::Int).unwrap();
        assert_eq!(pointer_diff(&types, fourth, base, &Type::Int).unwrap(), 4);
        assert_eq!(pointer_diff(&types, base, fourth, &Type::Int).unwrap(), -4);
    }
}
