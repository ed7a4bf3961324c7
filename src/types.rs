//! Type model and layout rules
//!
//! This module defines [`Type`] and the [`TypeTable`] registry that maps
//! struct and enum names to their definitions. Sizes and field offsets are
//! the ground truth for everything else: the arena sizes allocations from
//! them and pointer arithmetic strides by them.
//!
//! # Type Sizes
//!
//! Fixed, platform-independent sizes:
//! - `int`: 4 bytes
//! - `char`: 1 byte
//! - `long`: 8 bytes
//! - enum: 4 bytes (represented as its integer ordinal)
//! - pointer: 8 bytes (regardless of pointee type)
//! - struct: padded sum of field sizes under natural alignment
//!
//! Struct layout is computed once, when the struct is defined: each field is
//! placed at the next offset aligned to the field's own alignment, and the
//! total size is rounded up to the struct's alignment (the maximum field
//! alignment). Offsets are monotonically non-decreasing by construction.

use crate::errors::MemoryError;
use rustc_hash::FxHashMap;
use std::fmt;

/// Size of a pointer in bytes, regardless of pointee type
pub const POINTER_SIZE: usize = 8;

/// Size of an enum value in bytes (int-sized ordinal)
pub const ENUM_SIZE: usize = 4;

/// Types known to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Char,
    Long,
    Enum(String),              // Enum name
    Struct(String),            // Struct name
    Pointer(Box<Type>),        // Pointee type
    Array(Box<Type>, usize),   // Element type, length
}

impl Type {
    /// Shorthand for a pointer to `self`
    pub fn pointer_to(self) -> Type {
        Type::Pointer(Box::new(self))
    }

    /// Shorthand for an array of `len` elements of `self`
    pub fn array_of(self, len: usize) -> Type {
        Type::Array(Box::new(self), len)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Char => write!(f, "char"),
            Type::Long => write!(f, "long"),
            Type::Enum(name) => write!(f, "enum {}", name),
            Type::Struct(name) => write!(f, "struct {}", name),
            Type::Pointer(pointee) => write!(f, "{}*", pointee),
            Type::Array(elem, len) => write!(f, "{}[{}]", elem, len),
        }
    }
}

/// A struct field with its computed byte offset
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub offset: usize,
}

/// A struct definition with precomputed layout
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<Field>,
    pub size: usize,
    pub align: usize,
}

impl StructDef {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Result<&Field, MemoryError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| MemoryError::UnknownField {
                struct_name: self.name.clone(),
                field: name.to_string(),
            })
    }
}

/// An enum definition: members in declaration order, ordinals from 0
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub members: Vec<String>,
    ordinals: FxHashMap<String, i32>,
}

impl EnumDef {
    /// Ordinal of a member (declaration order, starting at 0)
    pub fn ordinal(&self, member: &str) -> Result<i32, MemoryError> {
        self.ordinals
            .get(member)
            .copied()
            .ok_or_else(|| MemoryError::UnknownMember {
                enum_name: self.name.clone(),
                member: member.to_string(),
            })
    }
}

/// Round `offset` up to the next multiple of `align`
pub(crate) fn align_up(offset: usize, align: usize) -> usize {
    (offset + align - 1) & !(align - 1)
}

/// Registry of struct and enum definitions
///
/// Sizes of non-nominal types are intrinsic; struct and enum sizes resolve
/// through this table, so it is threaded through every size computation.
#[derive(Debug, Default)]
pub struct TypeTable {
    structs: FxHashMap<String, StructDef>,
    enums: FxHashMap<String, EnumDef>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define an enum; ordinals follow declaration order starting at 0
    pub fn define_enum(&mut self, name: &str, members: &[&str]) -> Result<(), MemoryError> {
        if self.enums.contains_key(name) {
            return Err(MemoryError::TypeLayout(format!(
                "enum '{}' is already defined",
                name
            )));
        }
        let mut ordinals = FxHashMap::default();
        for (i, member) in members.iter().enumerate() {
            if ordinals.insert(member.to_string(), i as i32).is_some() {
                return Err(MemoryError::TypeLayout(format!(
                    "enum '{}' declares member '{}' twice",
                    name, member
                )));
            }
        }
        self.enums.insert(
            name.to_string(),
            EnumDef {
                name: name.to_string(),
                members: members.iter().map(|m| m.to_string()).collect(),
                ordinals,
            },
        );
        Ok(())
    }

    /// Define a struct, computing field offsets and total size
    pub fn define_struct(
        &mut self,
        name: &str,
        fields: Vec<(&str, Type)>,
    ) -> Result<(), MemoryError> {
        if self.structs.contains_key(name) {
            return Err(MemoryError::TypeLayout(format!(
                "struct '{}' is already defined",
                name
            )));
        }
        if fields.is_empty() {
            return Err(MemoryError::TypeLayout(format!(
                "struct '{}' has no fields",
                name
            )));
        }

        let mut laid_out = Vec::with_capacity(fields.len());
        let mut offset = 0;
        let mut align = 1;
        for (field_name, ty) in fields {
            if laid_out.iter().any(|f: &Field| f.name == field_name) {
                return Err(MemoryError::TypeLayout(format!(
                    "struct '{}' declares field '{}' twice",
                    name, field_name
                )));
            }
            // Nested struct/enum fields must already be defined
            let field_size = self.size_of(&ty)?;
            let field_align = self.align_of(&ty)?;
            offset = align_up(offset, field_align);
            laid_out.push(Field {
                name: field_name.to_string(),
                ty,
                offset,
            });
            offset += field_size;
            align = align.max(field_align);
        }

        self.structs.insert(
            name.to_string(),
            StructDef {
                name: name.to_string(),
                fields: laid_out,
                size: align_up(offset, align),
                align,
            },
        );
        Ok(())
    }

    /// Look up a struct definition
    pub fn struct_def(&self, name: &str) -> Result<&StructDef, MemoryError> {
        self.structs
            .get(name)
            .ok_or_else(|| MemoryError::UnknownStruct(name.to_string()))
    }

    /// Look up an enum definition
    pub fn enum_def(&self, name: &str) -> Result<&EnumDef, MemoryError> {
        self.enums
            .get(name)
            .ok_or_else(|| MemoryError::UnknownEnum(name.to_string()))
    }

    /// Size of a type in bytes
    pub fn size_of(&self, ty: &Type) -> Result<usize, MemoryError> {
        match ty {
            Type::Int => Ok(4),
            Type::Char => Ok(1),
            Type::Long => Ok(8),
            Type::Enum(name) => {
                self.enum_def(name)?;
                Ok(ENUM_SIZE)
            }
            Type::Struct(name) => Ok(self.struct_def(name)?.size),
            Type::Pointer(_) => Ok(POINTER_SIZE),
            Type::Array(elem, len) => Ok(self.size_of(elem)? * len),
        }
    }

    /// Natural alignment of a type in bytes
    pub fn align_of(&self, ty: &Type) -> Result<usize, MemoryError> {
        match ty {
            Type::Int => Ok(4),
            Type::Char => Ok(1),
            Type::Long => Ok(8),
            Type::Enum(name) => {
                self.enum_def(name)?;
                Ok(ENUM_SIZE)
            }
            Type::Struct(name) => Ok(self.struct_def(name)?.align),
            Type::Pointer(_) => Ok(POINTER_SIZE),
            Type::Array(elem, _) => self.align_of(elem),
        }
    }

    /// Byte offset of a field within a struct
    pub fn offset_of(&self, struct_name: &str, field: &str) -> Result<usize, MemoryError> {
        Ok(self.struct_def(struct_name)?.field(field)?.offset)
    }

    /// Ordered field layout of a struct
    pub fn layout(&self, struct_name: &str) -> Result<&[Field], MemoryError> {
        Ok(&self.struct_def(struct_name)?.fields)
    }

    /// Ordinal of an enum member
    pub fn ordinal(&self, enum_name: &str, member: &str) -> Result<i32, MemoryError> {
        self.enum_def(enum_name)?.ordinal(member)
    }
}
