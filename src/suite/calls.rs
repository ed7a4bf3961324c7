//! Parameter-passing scenarios
//!
//! `pass_as_value` binds its parameter to a fresh copy in the callee frame:
//! mutating it is invisible to the caller. `pass_as_ref` binds through a
//! pointer to the caller's storage: mutations are visible after return.

use super::{fixtures, put_point, Machine};
use crate::errors::MemoryError;
use crate::memory::{Address, Location, Region};
use std::io::Write;

fn pass_as_value<W: Write>(m: &mut Machine<W>, arg: &Location) -> Result<(), MemoryError> {
    m.arena.push_frame();
    let pt = m.arena.pass_by_value(&m.types, arg)?;
    put_point(m, "pass_as_value: Point: ", &pt)?;
    m.arena.write_int(&pt.field(&m.types, "x")?, 123)?;
    m.arena.write_int(&pt.field(&m.types, "y")?, 456)?;
    put_point(m, "pass_as_value: Point: ", &pt)?;
    m.arena.pop_frame();
    Ok(())
}

fn pass_as_ref<W: Write>(m: &mut Machine<W>, arg: Address) -> Result<(), MemoryError> {
    m.arena.push_frame();
    // The pointer itself passes by value; the pointee is shared
    let param = m
        .arena
        .allocate(&m.types, Region::Stack, fixtures::point().pointer_to())?;
    m.arena.write_ptr(&param, arg)?;

    let pt = m
        .arena
        .locate(&m.types, m.arena.read_ptr(&param)?, fixtures::point())?;
    put_point(m, "pass_as_ref: Point: ", &pt)?;
    m.arena.write_int(&pt.field(&m.types, "x")?, 123)?;
    m.arena.write_int(&pt.field(&m.types, "y")?, 456)?;
    put_point(m, "pass_as_ref: Point: ", &pt)?;
    m.arena.pop_frame();
    Ok(())
}

pub fn passing_as_value<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let pt = m.arena.allocate(&m.types, Region::Stack, fixtures::point())?;
    m.arena.write_int(&pt.field(&m.types, "x")?, 5)?;
    m.arena.write_int(&pt.field(&m.types, "y")?, 6)?;
    let shape_heap = m.arena.allocate(&m.types, Region::Heap, fixtures::shape())?;
    let shape_stack = m
        .arena
        .allocate(&m.types, Region::Stack, fixtures::shape())?;

    m.out.put_str("# test_passing_as_value\n")?;

    put_point(m, "pt: ", &pt)?;
    pass_as_value(m, &pt)?;
    put_point(m, "pt: ", &pt)?;
    pass_as_ref(m, pt.addr())?;
    put_point(m, "pt after pass_as_ref: ", &pt)?;

    let stack_origin = shape_stack.field(&m.types, "origin")?;
    m.arena.write_int(&stack_origin.field(&m.types, "x")?, 5)?;
    m.arena.write_int(&stack_origin.field(&m.types, "y")?, 6)?;
    let heap_origin = shape_heap.field(&m.types, "origin")?;
    m.arena.write_int(&heap_origin.field(&m.types, "x")?, 7)?;
    m.arena.write_int(&heap_origin.field(&m.types, "y")?, 8)?;

    put_point(m, "shape_stack: ", &stack_origin)?;
    pass_as_value(m, &stack_origin)?;
    put_point(m, "shape_stack: ", &stack_origin)?;
    pass_as_ref(m, stack_origin.addr())?;
    put_point(m, "shape_stack after pass_as_ref: ", &stack_origin)?;
    Ok(())
}
