//! Typed indices and the flat collections keyed by them.
//!
//! A handle is an "entity": a `u32` newtype declared with [`entity_def!`]
//! whose largest value is reserved as the [`Sentinel`]. The containers of this
//! crate are assembled from three pieces built on that:
//!
//! - [`SecondaryMap<K, V>`], a `Vec<V>` indexed by `K` that grows by a
//!   [`GrowthStrategy`]. Callers use it to attach their own data to handles.
//! - [`HandleSet<K>`], a bitset recording which handles are live.
//! - [`PackedOption<K>`], a handle or nothing in the size of a handle. Its
//!   "nothing" is what surfaces as [`NO_ENTRY`].
//!
//! [`GrowthStrategy`]: crate::GrowthStrategy
//! [`NO_ENTRY`]: crate::NO_ENTRY

#[macro_use]
pub mod base;
pub mod packed_option;
pub mod secondary_map;
pub mod set;

pub use base::EntityRef;
pub use packed_option::{PackedOption, Sentinel};
pub use secondary_map::SecondaryMap;
pub use set::HandleSet;
