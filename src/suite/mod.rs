//! Conformance scenarios and driver
//!
//! Each scenario replays one reference program's test function against the
//! value-semantics engine and writes its observable state to the output
//! harness. The driver runs the scenarios in a fixed order; the concatenated
//! output is compared byte-for-byte against the recorded golden transcript.
//!
//! A scenario that detects the pointer-arithmetic identity violation prints
//! the diagnostic itself and returns
//! [`MemoryError::PointerArithmeticMismatch`]; the driver stops immediately,
//! since a memory-model defect invalidates every subsequent result.

pub mod calls;
pub mod casts;
pub mod enums;
pub mod fixtures;
pub mod pointers;
pub mod recursion;
pub mod structs;

use crate::errors::MemoryError;
use crate::memory::{Arena, Location};
use crate::output::Output;
use crate::types::TypeTable;
use rustc_hash::FxHashMap;
use std::io::Write;
use tracing::debug;

/// Everything a scenario touches: the type registry, the arena, the output
/// stream, and the named static globals
pub struct Machine<W: Write> {
    pub types: TypeTable,
    pub arena: Arena,
    pub out: Output<W>,
    globals: FxHashMap<String, Location>,
}

impl<W: Write> Machine<W> {
    /// Build a machine with the fixture types registered and the static
    /// region initialized (init-once, zeroed, process lifetime)
    pub fn new(writer: W) -> Result<Self, MemoryError> {
        let mut types = TypeTable::new();
        let mut arena = Arena::new();
        fixtures::register(&mut types)?;
        let globals = fixtures::init_statics(&types, &mut arena)?;
        Ok(Machine {
            types,
            arena,
            out: Output::new(writer),
            globals,
        })
    }

    /// Location of a static global
    pub fn global(&self, name: &str) -> Result<Location, MemoryError> {
        self.globals
            .get(name)
            .cloned()
            .ok_or_else(|| MemoryError::UnknownGlobal(name.to_string()))
    }

    /// Recover the output writer (tests capture into a `Vec<u8>`)
    pub fn into_writer(self) -> W {
        self.out.into_inner()
    }
}

/// A named conformance scenario
pub struct Scenario<W: Write> {
    pub name: &'static str,
    pub run: fn(&mut Machine<W>) -> Result<(), MemoryError>,
}

/// All scenarios, in golden-transcript order
pub fn scenarios<W: Write>() -> Vec<Scenario<W>> {
    vec![
        Scenario {
            name: "enums",
            run: enums::run,
        },
        Scenario {
            name: "stack_structs",
            run: structs::stack_structs,
        },
        Scenario {
            name: "heap_structs",
            run: structs::heap_structs,
        },
        Scenario {
            name: "static_structs",
            run: structs::static_structs,
        },
        Scenario {
            name: "struct_assignment",
            run: structs::struct_assignment,
        },
        Scenario {
            name: "ptr_arith",
            run: pointers::ptr_arith,
        },
        Scenario {
            name: "nested_structs",
            run: structs::nested_structs,
        },
        Scenario {
            name: "passing_as_value",
            run: calls::passing_as_value,
        },
        Scenario {
            name: "casts",
            run: casts::run,
        },
        Scenario {
            name: "even_odd",
            run: recursion::even_odd,
        },
    ]
}

/// Run every scenario in order, each in its own stack frame
pub fn run_all<W: Write>(m: &mut Machine<W>) -> Result<(), MemoryError> {
    for scenario in scenarios() {
        debug!(
            scenario = scenario.name,
            depth = m.arena.frame_depth(),
            "running"
        );
        m.arena.push_frame();
        let result = (scenario.run)(m);
        m.arena.pop_frame();
        result?;
    }
    Ok(())
}

/// Print a labeled Point: `<label><x> <y>\n`
pub(crate) fn put_point<W: Write>(
    m: &mut Machine<W>,
    label: &str,
    pt: &Location,
) -> Result<(), MemoryError> {
    let x = m.arena.read_int(&pt.field(&m.types, "x")?)?;
    let y = m.arena.read_int(&pt.field(&m.types, "y")?)?;
    m.out.put_str(label)?;
    m.out.put_int(x)?;
    m.out.put_str(" ")?;
    m.out.put_int(y)?;
    m.out.put_char(b'\n')
}

/// Print a Shape row: `<origin.x> <origin.y> <r.w> <r.h>\n`
pub(crate) fn put_shape<W: Write>(
    m: &mut Machine<W>,
    shape: &Location,
) -> Result<(), MemoryError> {
    let origin = shape.field(&m.types, "origin")?;
    let r = shape.field(&m.types, "r")?;
    let row = [
        m.arena.read_int(&origin.field(&m.types, "x")?)?,
        m.arena.read_int(&origin.field(&m.types, "y")?)?,
        m.arena.read_int(&r.field(&m.types, "w")?)?,
        m.arena.read_int(&r.field(&m.types, "h")?)?,
    ];
    for (i, value) in row.iter().enumerate() {
        if i > 0 {
            m.out.put_str(" ")?;
        }
        m.out.put_int(*value)?;
    }
    m.out.put_char(b'\n')
}
