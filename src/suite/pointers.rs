//! Pointer-arithmetic identity scenario
//!
//! For every array-backed allocation, `base + i * sizeof(elem)` computed by
//! pointer arithmetic must be bit-identical to the address of `arr[i]`
//! obtained by indexing. Checked for heap struct arrays, pointer-to-pointer
//! arrays (stride is the pointer size, not the pointee struct size), and
//! stack arrays.
//!
//! This is the one failure mode the suite actively reports: on mismatch the
//! scenario prints both addresses and the run aborts.

use super::{fixtures, Machine};
use crate::errors::MemoryError;
use crate::memory::{pointer_add, Location, Region};
use crate::types::Type;
use std::io::Write;

fn check_identity<W: Write>(m: &mut Machine<W>, arr: &Location) -> Result<(), MemoryError> {
    let (elem, len) = match &arr.ty {
        Type::Array(elem, len) => ((**elem).clone(), *len),
        other => {
            return Err(MemoryError::TypeError {
                expected: "array".to_string(),
                got: other.to_string(),
            })
        }
    };

    for i in 0..len as i64 {
        let computed = pointer_add(&m.types, arr.addr(), i, &elem)?;
        let indexed = arr.index(&m.types, i)?.addr();
        if computed != indexed {
            m.out.put_str("Struct pointer arithmetic failed: ")?;
            m.out.put_int(computed as i64)?;
            m.out.put_str(" ")?;
            m.out.put_int(indexed as i64)?;
            m.out.put_char(b'\n')?;
            return Err(MemoryError::PointerArithmeticMismatch { computed, indexed });
        }
    }
    Ok(())
}

pub fn ptr_arith<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let point = fixtures::point();
    let pts = m
        .arena
        .allocate_array(&m.types, Region::Heap, point.clone(), 3)?;
    let pts2 = m
        .arena
        .allocate_array(&m.types, Region::Heap, point.clone().pointer_to(), 3)?;
    let pts3 = m.arena.allocate_array(&m.types, Region::Stack, point, 3)?;

    m.out.put_str("# test_ptr_arith\n")?;

    check_identity(m, &pts)?;
    // Through two levels of indirection
    check_identity(m, &pts2)?;
    // On stack arrays
    check_identity(m, &pts3)?;
    Ok(())
}
