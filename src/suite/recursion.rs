//! Mutual recursion scenario
//!
//! `even`/`odd` recurse through real stack frames (each call allocates a
//! local, as in the fixture, so frames are never empty) down to depth 10.
//! The results print through a digit-buffer renderer that spells out the
//! fixture's `putnumber`: digits are stored in a stack array and emitted in
//! reverse.

use super::Machine;
use crate::errors::MemoryError;
use crate::memory::Region;
use crate::types::Type;
use std::io::Write;

fn even<W: Write>(m: &mut Machine<W>, number: i64) -> Result<i64, MemoryError> {
    m.arena.push_frame();
    // Unused local, so the frame is not trivially empty (as in the fixture)
    let _a = m.arena.allocate(&m.types, Region::Stack, Type::Int)?;
    let result = if number == 0 {
        1
    } else {
        odd(m, number.abs() - 1)?
    };
    m.arena.pop_frame();
    Ok(result)
}

fn odd<W: Write>(m: &mut Machine<W>, number: i64) -> Result<i64, MemoryError> {
    m.arena.push_frame();
    let _a = m.arena.allocate(&m.types, Region::Stack, Type::Int)?;
    let result = if number == 0 {
        0
    } else {
        even(m, number.abs() - 1)?
    };
    m.arena.pop_frame();
    Ok(result)
}

/// `putnumber`: non-negative decimal rendering through a stack digit buffer
fn put_number<W: Write>(m: &mut Machine<W>, mut n: i64) -> Result<(), MemoryError> {
    if n == 0 {
        return m.out.put_char(b'0');
    }
    let digits = m
        .arena
        .allocate_array(&m.types, Region::Stack, Type::Int, 10)?;
    let mut i = 0;
    while n > 0 {
        let slot = digits.index(&m.types, i)?;
        m.arena.write_int(&slot, n % 10)?;
        n /= 10;
        i += 1;
    }
    while i > 0 {
        i -= 1;
        let digit = m.arena.read_int(&digits.index(&m.types, i)?)?;
        m.out.put_char(b'0' + digit as u8)?;
    }
    Ok(())
}

pub fn even_odd<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let n1 = even(m, 10)?;
    let n2 = odd(m, 10)?;

    m.out.put_str("n1 = ")?;
    put_number(m, n1)?;
    m.out.put_char(b'\n')?;
    m.out.put_str("n2 = ")?;
    put_number(m, n2)?;
    m.out.put_char(b'\n')?;
    Ok(())
}
