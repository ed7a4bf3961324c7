//! Struct storage and copy scenarios
//!
//! Covers stack, heap, and static storage for structs, whole-struct
//! assignment, and nested struct layout.

use super::{fixtures, put_point, put_shape, Machine};
use crate::errors::MemoryError;
use crate::memory::Region;
use std::io::Write;

/// Stack-allocated structs and a stack array of structs
pub fn stack_structs<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let point = fixtures::point();
    let points_local = m
        .arena
        .allocate_array(&m.types, Region::Stack, point.clone(), 3)?;
    let pt2 = m.arena.allocate(&m.types, Region::Stack, point)?;

    m.out.put_str("# test_stack_structs\n")?;

    m.arena.write_int(&pt2.field(&m.types, "x")?, 15)?;
    m.arena.write_int(&pt2.field(&m.types, "y")?, 16)?;

    put_point(m, "pt2: ", &pt2)?;

    for i in 0..3 {
        let elem = points_local.index(&m.types, i)?;
        m.arena.write_int(&elem.field(&m.types, "x")?, i)?;
        m.arena.write_int(&elem.field(&m.types, "y")?, i * i)?;
    }

    for i in 0..3 {
        let elem = points_local.index(&m.types, i)?;
        put_point(m, "", &elem)?;
    }
    Ok(())
}

/// Heap-allocated structs reached through stack pointer variables
pub fn heap_structs<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let rect = fixtures::rectangle();
    let r1_alloc = m.arena.allocate(&m.types, Region::Heap, rect.clone())?;
    let r2_alloc = m.arena.allocate(&m.types, Region::Heap, rect.clone())?;

    // The pointers live on the stack; the structs live on the heap
    let r1 = m
        .arena
        .allocate(&m.types, Region::Stack, rect.clone().pointer_to())?;
    let r2 = m
        .arena
        .allocate(&m.types, Region::Stack, rect.clone().pointer_to())?;
    m.arena.write_ptr(&r1, r1_alloc.addr())?;
    m.arena.write_ptr(&r2, r2_alloc.addr())?;

    m.out.put_str("# test_heap_structs\n")?;

    // r1->w = 5; r1->h = 6; and likewise for r2
    let r1_target = m.arena.locate(&m.types, m.arena.read_ptr(&r1)?, rect.clone())?;
    m.arena.write_int(&r1_target.field(&m.types, "w")?, 5)?;
    m.arena.write_int(&r1_target.field(&m.types, "h")?, 6)?;

    let r2_target = m.arena.locate(&m.types, m.arena.read_ptr(&r2)?, rect)?;
    m.arena.write_int(&r2_target.field(&m.types, "w")?, 7)?;
    m.arena.write_int(&r2_target.field(&m.types, "h")?, 8)?;

    // The reference program prints h before w
    for (label, target) in [("r1: ", &r1_target), ("r2: ", &r2_target)] {
        let h = m.arena.read_int(&target.field(&m.types, "h")?)?;
        let w = m.arena.read_int(&target.field(&m.types, "w")?)?;
        m.out.put_str(label)?;
        m.out.put_int(h)?;
        m.out.put_str(" ")?;
        m.out.put_int(w)?;
        m.out.put_char(b'\n')?;
    }
    Ok(())
}

/// File-scope statics: zero-initialized, then assigned struct-to-struct
pub fn static_structs<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    m.out.put_str("# test_static_structs\n")?;

    let p1 = m.global("point_static1")?;
    let p2 = m.global("point_static2")?;

    m.arena.write_int(&p1.field(&m.types, "x")?, 5)?;
    m.arena.write_int(&p1.field(&m.types, "y")?, 12)?;

    put_point(m, "point_static1: ", &p1)?;
    // Never written: static storage reads back zero
    put_point(m, "point_static2: ", &p2)?;

    m.arena.copy(&m.types, &p2, &p1)?;

    put_point(m, "point_static1: ", &p1)?;
    put_point(m, "point_static2: ", &p2)?;
    Ok(())
}

/// Whole-struct assignment and nested sub-struct assignment
pub fn struct_assignment<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let point = fixtures::point();
    let shape = fixtures::shape();

    let pt1 = m.arena.allocate(&m.types, Region::Stack, point.clone())?;
    let pt2 = m.arena.allocate(&m.types, Region::Stack, point.clone())?;
    let pts = m
        .arena
        .allocate_array(&m.types, Region::Heap, point, 3)?;
    let shapes = m.arena.allocate_array(&m.types, Region::Heap, shape, 3)?;

    m.out.put_str("# test_struct_assignment\n")?;

    m.arena.write_int(&pt1.field(&m.types, "x")?, 5)?;
    m.arena.write_int(&pt1.field(&m.types, "y")?, 6)?;

    // pt2 = pt1: independent storage from here on
    m.arena.copy(&m.types, &pt2, &pt1)?;

    put_point(m, "pt1: ", &pt1)?;
    put_point(m, "pt2: ", &pt2)?;

    for i in 0..3 {
        let elem = pts.index(&m.types, i)?;
        m.arena.write_int(&elem.field(&m.types, "x")?, i)?;
        m.arena.write_int(&elem.field(&m.types, "y")?, i * i)?;
    }

    // shapes[i].origin = pts[i]: copies only the sub-struct's span
    for i in 0..3 {
        let origin = shapes.index(&m.types, i)?.field(&m.types, "origin")?;
        let src = pts.index(&m.types, i)?;
        m.arena.copy(&m.types, &origin, &src)?;
    }

    for i in 0..3 {
        let origin = shapes.index(&m.types, i)?.field(&m.types, "origin")?;
        put_point(m, "", &origin)?;
    }
    Ok(())
}

/// Nested struct field writes and reads through the full layout
pub fn nested_structs<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let shapes = m
        .arena
        .allocate_array(&m.types, Region::Heap, fixtures::shape(), 3)?;

    m.out.put_str("# test_nested_structs\n")?;

    for i in 0..3 {
        let elem = shapes.index(&m.types, i)?;
        let origin = elem.field(&m.types, "origin")?;
        m.arena.write_int(&origin.field(&m.types, "x")?, i + 2)?;
        m.arena
            .write_int(&origin.field(&m.types, "y")?, (i + 2) * (i + 2))?;
        let r = elem.field(&m.types, "r")?;
        m.arena.write_int(&r.field(&m.types, "w")?, i)?;
        m.arena.write_int(&r.field(&m.types, "h")?, i * i)?;
    }

    for i in 0..3 {
        let elem = shapes.index(&m.types, i)?;
        put_shape(m, &elem)?;
    }
    Ok(())
}
