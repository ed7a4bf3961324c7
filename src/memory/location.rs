//! Typed lvalue references
//!
//! A [`Location`] says *where* a value lives: the base address of its
//! allocation, a byte offset within it, and the type the bytes are read
//! under. It is the result of evaluating an lvalue (variable, field access,
//! array index, dereference) and is distinct from the value itself.
//!
//! Navigation never touches memory: `field` and `index` only move the
//! offset and narrow the type. Reads and writes go through the arena.

use crate::errors::MemoryError;
use crate::memory::Address;
use crate::types::{Type, TypeTable};

/// An addressable, typed reference into an allocation
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Base address of the owning allocation
    pub base: Address,
    /// Byte offset within the allocation
    pub offset: u64,
    /// Type the span at `base + offset` is viewed under
    pub ty: Type,
}

impl Location {
    pub fn new(base: Address, ty: Type) -> Self {
        Location {
            base,
            offset: 0,
            ty,
        }
    }

    /// Absolute address this location denotes
    pub fn addr(&self) -> Address {
        self.base + self.offset
    }

    /// Narrow to a struct field
    pub fn field(&self, types: &TypeTable, name: &str) -> Result<Location, MemoryError> {
        match &self.ty {
            Type::Struct(struct_name) => {
                let field = types.struct_def(struct_name)?.field(name)?;
                Ok(Location {
                    base: self.base,
                    offset: self.offset + field.offset as u64,
                    ty: field.ty.clone(),
                })
            }
            other => Err(MemoryError::TypeError {
                expected: "struct".to_string(),
                got: other.to_string(),
            }),
        }
    }

    /// Narrow to an array element
    ///
    /// Element `i` begins exactly `i * sizeof(element)` bytes past the array
    /// base; this is the indexing half of the pointer-arithmetic identity.
    pub fn index(&self, types: &TypeTable, index: i64) -> Result<Location, MemoryError> {
        match &self.ty {
            Type::Array(elem, len) => {
                if index < 0 || index as usize >= *len {
                    return Err(MemoryError::IndexOutOfBounds { index, len: *len });
                }
                let stride = types.size_of(elem)? as u64;
                Ok(Location {
                    base: self.base,
                    offset: self.offset + index as u64 * stride,
                    ty: (**elem).clone(),
                })
            }
            other => Err(MemoryError::TypeError {
                expected: "array".to_string(),
                got: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_table() -> TypeTable {
        let mut types = TypeTable::new();
        types
            .define_struct("Point", vec![("x", Type::Int), ("y", Type::Int)])
            .unwrap();
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
        types
    }

    #[test]
    fn field_navigation_accumulates_offsets() {
        let types = shape_table();
        let shape = Location::new(0x4000, Type::Struct("Shape".into()));
        let r = shape.field(&types, "r").unwrap();
        assert_eq!(r.addr(), 0x4008);
        let h = r.field(&types, "h").unwrap();
        assert_eq!(h.addr(), 0x400c);
        assert_eq!(h.ty, Type::Int);
    }

    #[test]
    fn index_strides_by_element_size() {
        let types = shape_table();
        let arr = Location::new(0x4000, Type::Struct("Shape".into()).array_of(3));
        let second = arr.index(&types, 2).unwrap();
        assert_eq!(second.addr(), 0x4000 + 2 * 16);
        assert_eq!(second.ty, Type::Struct("Shape".into()));
        assert!(matches!(
            arr.index(&types, 3),
            Err(MemoryError::IndexOutOfBounds { index: 3, len: 3 })
        ));
    }

    #[test]
    fn field_on_scalar_is_a_type_error() {
        let types = shape_table();
        let loc = Location::new(0x4000, Type::Int);
        assert!(matches!(
            loc.field(&types, "x"),
            Err(MemoryError::TypeError { .. })
        ));
    }
}
