//! Flat, array-backed collections which hand out compact integer handles.
//!
//! Every container in this crate identifies the items it stores with a
//! [`Handle`]: a small integer which stays stable until the item is removed.
//! Because handles are dense (a fresh container hands out `0, 1, 2, ...`),
//! callers can keep per-item data in their own parallel arrays (for example a
//! [`SecondaryMap<Handle, T>`]) without any indirection or extra allocation.
//!
//! This crate is compatible with `#![no_std]` and only requires `alloc`.
//!
//! # Containers
//!
//! - [`HashTable`] is a separate-chaining hash map (or set, via [`HashSet`])
//!   whose buckets are threaded through a [`MultiList`].
//! - [`BinaryHeap`] is a priority queue which supports removing any element by
//!   its handle in O(log n), using an inverse index into the heap array.
//! - [`ByteBlockArena`] stores variable-length byte blobs and reclaims the space
//!   of removed blobs with an explicit [`ByteBlockArena::compact`].
//! - [`sort::sort`] sorts a "master" slice while mirroring every swap onto any
//!   number of "slave" sequences that must stay in lockstep with it.
//!
//! # Growth
//!
//! All containers are created with an initial capacity and only grow on
//! demand. How much they grow by is decided by a [`GrowthStrategy`]. A strategy
//! which returns less than what was asked for is a configuration bug and is
//! reported as [`Error::GrowthFailure`].
//!
//! # Absence
//!
//! Looking up something that isn't there is not an error. Lookups return a
//! [`PackedOption<Handle>`] (the size of a single `u32`, with `NO_ENTRY` encoded
//! as the reserved value), an `Option`, a `bool` or a caller-supplied default.
//! [`Error`] is reserved for programming and configuration mistakes.
//!
//! # Validation
//!
//! The [`debug_utils`] module can check the internal invariants of every
//! container. This is relatively expensive and is mostly intended for tests and
//! fuzzing.
//!
//! [`SecondaryMap<Handle, T>`]: entity::SecondaryMap
//! [`PackedOption<Handle>`]: entity::PackedOption

#![no_std]
#![warn(rust_2018_idioms, missing_docs)]
#![allow(
    clippy::collapsible_if,
    clippy::collapsible_else_if,
    clippy::cast_possible_truncation,
    clippy::too_many_lines,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]
#![warn(
    clippy::explicit_iter_loop,
    clippy::range_plus_one,
    clippy::map_unwrap_or,
    clippy::cloned_instead_of_copied,
    clippy::semicolon_if_nothing_returned,
    clippy::must_use_candidate,
    clippy::iter_without_into_iter,
    clippy::uninlined_format_args,
    clippy::ignored_unit_patterns
)]

extern crate alloc;

// Even when trace logging is disabled, the trace macro has a significant
// performance cost so we disable it in release builds.
macro_rules! trace {
    ($($tt:tt)*) => {
        if cfg!(feature = "trace-log") {
            ::log::trace!($($tt)*);
        }
    };
}

#[macro_use]
pub mod entity;

pub mod arena;
pub mod compare;
pub mod debug_utils;
pub mod growth;
pub mod handle;
pub mod hash;
pub mod heap;
pub mod multi_list;
pub mod sort;

mod error;

pub use arena::ByteBlockArena;
pub use compare::Direction;
pub use error::Error;
pub use growth::GrowthStrategy;
pub use handle::{Handle, HandleAllocator, NO_ENTRY};
pub use hash::{HashMap, HashSet, HashTable};
pub use heap::BinaryHeap;
pub use multi_list::MultiList;
pub use sort::Swappable;
