//! Type punning scenario
//!
//! A raw heap span is written through a reinterpreted `Shape` view (the
//! fixture's `*((Shape*)words + i) = shape`) and read back through a second
//! reinterpreted view. Both casts are expressed as checked reinterpretation
//! of an existing allocation, bounded by the allocation's size.

use super::{fixtures, put_shape, Machine};
use crate::errors::MemoryError;
use crate::memory::{pointer_add, Region};
use crate::types::Type;
use std::io::Write;

pub fn run<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let shape = fixtures::shape();
    let shape_size = m.types.size_of(&shape)?;

    // malloc(5 * sizeof(Shape)) as an untyped byte span
    let words = m
        .arena
        .allocate_array(&m.types, Region::Heap, Type::Char, 5 * shape_size)?;
    let scratch = m.arena.allocate(&m.types, Region::Stack, shape.clone())?;

    m.out.put_str("# test_casts\n")?;

    for i in 0..5 {
        let origin = scratch.field(&m.types, "origin")?;
        m.arena.write_int(&origin.field(&m.types, "x")?, i * 13)?;
        m.arena.write_int(&origin.field(&m.types, "y")?, i * 17)?;
        let r = scratch.field(&m.types, "r")?;
        m.arena.write_int(&r.field(&m.types, "w")?, i * 19)?;
        m.arena.write_int(&r.field(&m.types, "h")?, i * 23)?;

        // Cast on the left side: *((Shape*)words + i) = scratch
        let slot_addr = pointer_add(&m.types, words.addr(), i, &shape)?;
        let slot = m.arena.locate(&m.types, slot_addr, shape.clone())?;
        m.arena.copy(&m.types, &slot, &scratch)?;
    }

    // Cast on the right side: Shape* shapes_arr = (Shape*)words
    let shapes_arr = m
        .arena
        .reinterpret(&m.types, &words, shape.array_of(5))?;

    for i in 0..5 {
        let elem = shapes_arr.index(&m.types, i)?;
        put_shape(m, &elem)?;
    }
    Ok(())
}
