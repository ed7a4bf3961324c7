//! Error types for the value-semantics engine
//!
//! This module defines [`MemoryError`], which covers everything that can go
//! wrong while laying out types, addressing storage, or emitting output.
//!
//! Most variants are defensive: a conforming scenario never triggers them.
//! The one error a scenario actively checks for and reports is
//! [`MemoryError::PointerArithmeticMismatch`]: it is fatal, reported on the
//! output stream by the scenario itself, and maps to a distinguished nonzero
//! exit status in the binary.

use crate::memory::Address;
use std::io;
use thiserror::Error;

/// Errors raised by the type model, the memory arena, and the output harness
#[derive(Error, Debug)]
pub enum MemoryError {
    /// Malformed type definition (empty struct, duplicate field, ...)
    #[error("malformed type layout: {0}")]
    TypeLayout(String),

    /// Struct definition not found
    #[error("struct '{0}' is not defined")]
    UnknownStruct(String),

    /// Enum definition not found
    #[error("enum '{0}' is not defined")]
    UnknownEnum(String),

    /// Struct field not found
    #[error("struct '{struct_name}' does not have field '{field}'")]
    UnknownField { struct_name: String, field: String },

    /// Enum member not found
    #[error("enum '{enum_name}' does not have member '{member}'")]
    UnknownMember { enum_name: String, member: String },

    /// Static global not registered at startup
    #[error("global '{0}' is not defined")]
    UnknownGlobal(String),

    /// Stack allocation requested with no live frame
    #[error("no stack frame available")]
    NoStackFrame,

    /// Accessed a released allocation (freed heap block or popped frame)
    #[error("use-after-free: address {address:#x} has been released")]
    UseAfterFree { address: Address },

    /// Double free
    #[error("double free at address {address:#x}")]
    DoubleFree { address: Address },

    /// Freeing storage outside the heap region
    #[error("invalid free: address {address:#x} is not a heap allocation")]
    InvalidFree { address: Address },

    /// Address not inside any allocation
    #[error("invalid pointer: address {address:#x} is not inside any allocation")]
    InvalidPointer { address: Address },

    /// Array index out of range
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// Byte access past the end of an allocation
    #[error("buffer overrun: {len} bytes at offset {offset} in a block of {size} bytes")]
    BufferOverrun {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// The pointer-plus-integer vs. address-of-index identity failed
    #[error(
        "pointer arithmetic mismatch: advance gave {computed:#x}, indexing gave {indexed:#x}"
    )]
    PointerArithmeticMismatch { computed: Address, indexed: Address },

    /// Operation applied to a value of the wrong type
    #[error("type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    /// Output stream failure
    #[error("output error: {0}")]
    Io(#[from] io::Error),
}
