//! # Introduction
//!
//! structsem is a golden-output conformance engine for the aggregate value
//! semantics of a small C subset: how composite values are laid out, copied
//! on assignment and across call boundaries, addressed under pointer
//! arithmetic, and reinterpreted between types. Each scenario replays one
//! reference program's observable behaviour and emits a deterministic
//! transcript that must match the recorded golden output byte for byte.
//!
//! ## Pipeline
//!
//! ```text
//! TypeTable → Arena → {copy engine, pointer arithmetic} → Output → suite
//! ```
//!
//! 1. [`types`] — the type model: scalars, enums, structs with computed
//!    layouts, pointers, arrays; sizes and field offsets.
//! 2. [`memory`] — the storage model: a region-banded
//!    [`memory::arena::Arena`] (stack frames, heap, statics), typed
//!    [`memory::location::Location`] lvalues, the bytewise copy engine, and
//!    stride-scaled pointer arithmetic.
//! 3. [`output`] — deterministic byte-stream rendering for golden
//!    comparison.
//! 4. [`suite`] — the conformance scenarios and the driver that runs them in
//!    fixed order.
//!
//! ## Semantics covered
//!
//! Enum ordinal representation, struct copy independence, pass-by-value vs.
//! pass-by-pointer, nested struct layout, the pointer-plus-integer vs.
//! address-of-index identity (including pointer-to-pointer strides), stack
//! vs. heap vs. static storage, and checked type punning.

pub mod errors;
pub mod memory;
pub mod output;
pub mod suite;
pub mod types;
