//! Invariant checks for the containers of this crate.
//!
//! These are not needed for normal use, but are useful in tests and fuzzers to
//! catch corruption of the internal arrays as soon as it happens rather than
//! when a lookup eventually returns the wrong entry.

mod validate_arena;
mod validate_handles;
mod validate_hash;
mod validate_heap;

pub use validate_arena::*;
pub use validate_handles::*;
pub use validate_hash::*;
pub use validate_heap::*;
