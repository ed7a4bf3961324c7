//! Aggregate copy engine and scalar accessors
//!
//! Copying an aggregate is a shallow, bytewise copy of its full span:
//! assignment, pass-by-value argument binding, and array element stores all
//! reduce to the same operation. After a copy the two spans are independent
//! storage; mutating one is never observable through the other.
//!
//! Scalars and pointers are read and written little-endian at the width of
//! the location's type.

use crate::errors::MemoryError;
use crate::memory::{Address, Arena, Location, Region};
use crate::types::{Type, TypeTable};

impl Arena {
    /// Copy `sizeof(src.ty)` bytes from the source span into the destination
    ///
    /// Used for assignment (`a = b`), array element stores
    /// (`arr[i] = value`), and nested-field stores
    /// (`shapes[i].origin = pts[i]` copies only the sub-struct's span).
    pub fn copy(
        &mut self,
        types: &TypeTable,
        dst: &Location,
        src: &Location,
    ) -> Result<(), MemoryError> {
        let len = types.size_of(&src.ty)?;
        let bytes = self.read_bytes(src.addr(), len)?;
        self.write_bytes(dst.addr(), &bytes)
    }

    /// Bind an aggregate argument by value: copy it into a fresh slot in the
    /// current (callee) frame
    ///
    /// Mutations of the returned slot are invisible to the caller's
    /// argument.
    pub fn pass_by_value(
        &mut self,
        types: &TypeTable,
        arg: &Location,
    ) -> Result<Location, MemoryError> {
        let slot = self.allocate(types, Region::Stack, arg.ty.clone())?;
        self.copy(types, &slot, arg)?;
        Ok(slot)
    }

    /// Read an integer at the width of the location's type (sign-extended)
    pub fn read_int(&self, loc: &Location) -> Result<i64, MemoryError> {
        match &loc.ty {
            Type::Char => {
                let bytes = self.read_bytes(loc.addr(), 1)?;
                Ok(bytes[0] as i8 as i64)
            }
            Type::Int | Type::Enum(_) => {
                let bytes = self.read_bytes(loc.addr(), 4)?;
                Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64)
            }
            Type::Long => {
                let bytes = self.read_bytes(loc.addr(), 8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes);
                Ok(i64::from_le_bytes(raw))
            }
            other => Err(MemoryError::TypeError {
                expected: "integer".to_string(),
                got: other.to_string(),
            }),
        }
    }

    /// Write an integer at the width of the location's type (truncating)
    pub fn write_int(&mut self, loc: &Location, value: i64) -> Result<(), MemoryError> {
        match &loc.ty {
            Type::Char => self.write_bytes(loc.addr(), &(value as i8).to_le_bytes()),
            Type::Int | Type::Enum(_) => self.write_bytes(loc.addr(), &(value as i32).to_le_bytes()),
            Type::Long => self.write_bytes(loc.addr(), &value.to_le_bytes()),
            other => Err(MemoryError::TypeError {
                expected: "integer".to_string(),
                got: other.to_string(),
            }),
        }
    }

    /// Read a pointer value (8 bytes, little-endian)
    pub fn read_ptr(&self, loc: &Location) -> Result<Address, MemoryError> {
        match &loc.ty {
            Type::Pointer(_) => {
                let bytes = self.read_bytes(loc.addr(), 8)?;
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&bytes);
                Ok(Address::from_le_bytes(raw))
            }
            other => Err(MemoryError::TypeError {
                expected: "pointer".to_string(),
                got: other.to_string(),
            }),
        }
    }

    /// Write a pointer value (8 bytes, little-endian)
    pub fn write_ptr(&mut self, loc: &Location, addr: Address) -> Result<(), MemoryError> {
        match &loc.ty {
            Type::Pointer(_) => self.write_bytes(loc.addr(), &addr.to_le_bytes()),
            other => Err(MemoryError::TypeError {
                expected: "pointer".to_string(),
                got: other.to_string(),
            }),
        }
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

    fn set_point(
        arena: &mut Arena,
        types: &TypeTable,
        pt: &Location,
        x: i64,
        y: i64,
    ) {
        arena.write_int(&pt.field(types, "x").unwrap(), x).unwrap();
        arena.write_int(&pt.field(types, "y").unwrap(), y).unwrap();
    }

    fn get_point(arena: &Arena, types: &TypeTable, pt: &Location) -> (i64, i64) {
        (
            arena.read_int(&pt.field(types, "x").unwrap()).unwrap(),
            arena.read_int(&pt.field(types, "y").unwrap()).unwrap(),
        )
    }

    #[test]
    fn copies_are_independent_storage() {
        let types = point_table();
        let mut arena = Arena::new();
        arena.push_frame();
        let point = Type::Struct("Point".into());
        let a = arena.allocate(&types, Region::Stack, point.clone()).unwrap();
        let b = arena.allocate(&types, Region::Stack, point).unwrap();

        set_point(&mut arena, &types, &a, 5, 6);
        arena.copy(&types, &b, &a).unwrap();
        assert_eq!(get_point(&arena, &types, &b), (5, 6));

        // Mutating either side is invisible through the other
        set_point(&mut arena, &types, &b, 123, 456);
        assert_eq!(get_point(&arena, &types, &a), (5, 6));
        set_point(&mut arena, &types, &a, -1, -2);
        assert_eq!(get_point(&arena, &types, &b), (123, 456));
    }

    #[test]
    fn pass_by_value_isolates_the_caller() {
        let types = point_table();
        let mut arena = Arena::new();
        arena.push_frame();
        let arg = arena
            .allocate(&types, Region::Stack, Type::Struct("Point".into()))
            .unwrap();
        set_point(&mut arena, &types, &arg, 5, 6);

        arena.push_frame();
        let param = arena.pass_by_value(&types, &arg).unwrap();
        assert_eq!(get_point(&arena, &types, &param), (5, 6));
        set_point(&mut arena, &types, &param, 123, 456);
        arena.pop_frame();

        assert_eq!(get_point(&arena, &types, &arg), (5, 6));
    }

    #[test]
    fn nested_field_copy_leaves_siblings_untouched() {
        let mut types = point_table();
        types
            .define_struct("Rectangle", vec![("w", Type::Int), ("h", Type::Int)])
            .unwrap();
        types
            .define_struct(
                "Shape",
                vec![
                    ("origin", Type::Struct("Point".into())),
                    ("r", Type::Struct("Rectangle".into())),
                ],
            )
            .unwrap();
        let mut arena = Arena::new();
        let shape = arena
            .allocate(&types, Region::Heap, Type::Struct("Shape".into()))
            .unwrap();
        let r = shape.field(&types, "r").unwrap();
        arena.write_int(&r.field(&types, "w").unwrap(), 19).unwrap();
        arena.write_int(&r.field(&types, "h").unwrap(), 23).unwrap();

        let pt = arena
            .allocate(&types, Region::Heap, Type::Struct("Point".into()))
            .unwrap();
        set_point(&mut arena, &types, &pt, 7, 8);
        let origin = shape.field(&types, "origin").unwrap();
        arena.copy(&types, &origin, &pt).unwrap();

        assert_eq!(get_point(&arena, &types, &origin), (7, 8));
        assert_eq!(arena.read_int(&r.field(&types, "w").unwrap()).unwrap(), 19);
        assert_eq!(arena.read_int(&r.field(&types, "h").unwrap()).unwrap(), 23);
    }

    #[test]
    fn scalar_widths_round_trip() {
        let types = TypeTable::new();
        let mut arena = Arena::new();
        let c = arena.allocate(&types, Region::Heap, Type::Char).unwrap();
        arena.write_int(&c, -3).unwrap();
        assert_eq!(arena.read_int(&c).unwrap(), -3);

        let n = arena.allocate(&types, Region::Heap, Type::Int).unwrap();
        arena.write_int(&n, -70000).unwrap();
        assert_eq!(arena.read_int(&n).unwrap(), -70000);

        let l = arena.allocate(&types, Region::Heap, Type::Long).unwrap();
        arena.write_int(&l, i64::MIN).unwrap();
        assert_eq!(arena.read_int(&l).unwrap(), i64::MIN);
    }

    #[test]
    fn pointers_round_trip_through_memory() {
        let types = point_table();
        let mut arena = Arena::new();
        let target = arena
            .allocate(&types, Region::Heap, Type::Struct("Point".into()))
            .unwrap();
        let slot = arena
            .allocate(
                &types,
                Region::Heap,
                Type::Struct("Point".into()).pointer_to(),
            )
            .unwrap();
        arena.write_ptr(&slot, target.addr()).unwrap();
        assert_eq!(arena.read_ptr(&slot).unwrap(), target.addr());
        assert!(matches!(
            arena.read_ptr(&target),
            Err(MemoryError::TypeError { .. })
        ));
    }
}
