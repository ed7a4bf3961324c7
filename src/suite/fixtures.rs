//! Fixture types and static globals shared by the scenarios
//!
//! The registry mirrors the reference programs' declarations: two enums,
//! `Point` and `Rectangle`, and `Shape` nesting both. The static region
//! holds the file-scope variables, zero-initialized before any scenario
//! runs.

use crate::errors::MemoryError;
use crate::memory::{Arena, Location, Region};
use crate::types::{Type, TypeTable};
use rustc_hash::FxHashMap;

pub fn point() -> Type {
    Type::Struct("Point".to_string())
}

pub fn rectangle() -> Type {
    Type::Struct("Rectangle".to_string())
}

pub fn shape() -> Type {
    Type::Struct("Shape".to_string())
}

pub fn direction() -> Type {
    Type::Enum("Direction".to_string())
}

/// Register every fixture type
pub fn register(types: &mut TypeTable) -> Result<(), MemoryError> {
    types.define_enum("Direction", &["Up", "Down", "Left", "Right"])?;
    types.define_enum("CardinalDirection", &["North", "South", "East", "West"])?;
    types.define_struct("Rectangle", vec![("w", Type::Int), ("h", Type::Int)])?;
    types.define_struct("Point", vec![("x", Type::Int), ("y", Type::Int)])?;
    types.define_struct("Shape", vec![("origin", point()), ("r", rectangle())])?;
    Ok(())
}

/// Allocate the file-scope statics (zeroed, process lifetime)
pub fn init_statics(
    types: &TypeTable,
    arena: &mut Arena,
) -> Result<FxHashMap<String, Location>, MemoryError> {
    let mut globals = FxHashMap::default();
    globals.insert(
        "points_static".to_string(),
        arena.allocate_array(types, Region::Static, point(), 3)?,
    );
    globals.insert(
        "point_static1".to_string(),
        arena.allocate(types, Region::Static, point())?,
    );
    globals.insert(
        "point_static2".to_string(),
        arena.allocate(types, Region::Static, point())?,
    );
    Ok(globals)
}
