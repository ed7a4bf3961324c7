//! Enum representation scenario
//!
//! Enum values are their integer ordinals: they cross call boundaries like
//! ints and print as decimal ordinals.

use super::{fixtures, Machine};
use crate::errors::MemoryError;
use crate::memory::{Location, Region};
use std::io::Write;

/// `f(dir, dir2)`: receives two enum values by value and prints both
fn print_directions<W: Write>(
    m: &mut Machine<W>,
    dir: &Location,
    dir2: &Location,
) -> Result<(), MemoryError> {
    m.arena.push_frame();
    let a = m.arena.pass_by_value(&m.types, dir)?;
    let b = m.arena.pass_by_value(&m.types, dir2)?;
    m.out.put_str("Direction: ")?;
    let first = m.arena.read_int(&a)?;
    m.out.put_int(first)?;
    m.out.put_str(" ")?;
    let second = m.arena.read_int(&b)?;
    m.out.put_int(second)?;
    m.out.put_char(b'\n')?;
    m.arena.pop_frame();
    Ok(())
}

pub fn run<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    let direction = fixtures::direction();

    let up = m.arena.allocate(&m.types, Region::Stack, direction.clone())?;
    let down = m.arena.allocate(&m.types, Region::Stack, direction.clone())?;
    let left = m.arena.allocate(&m.types, Region::Stack, direction.clone())?;
    let right = m.arena.allocate(&m.types, Region::Stack, direction)?;

    for (var, member) in [(&up, "Up"), (&down, "Down"), (&left, "Left"), (&right, "Right")] {
        let ordinal = m.types.ordinal("Direction", member)? as i64;
        m.arena.write_int(var, ordinal)?;
    }

    m.out.put_str("# test_enums\n")?;

    print_directions(m, &up, &down)?;
    print_directions(m, &left, &right)?;
    Ok(())
}
