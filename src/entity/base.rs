//! The entity trait and the macro defining entity types.

use super::packed_option::Sentinel;

/// A dense index wrapped in its own type.
///
/// Handles, buckets and list identifiers are all entities. They can key a
/// [`SecondaryMap`], be tracked in a [`HandleSet`] and link the entries of a
/// [`MultiList`]. The largest value of the underlying integer is the
/// [`Sentinel`], so an entity never has that index.
///
/// [`SecondaryMap`]: super::SecondaryMap
/// [`HandleSet`]: super::HandleSet
/// [`MultiList`]: crate::MultiList
pub trait EntityRef: Copy + Eq + Sentinel {
    /// Wraps `index`.
    fn new(index: usize) -> Self;

    /// Unwraps the index.
    fn index(self) -> usize;
}

/// Declares entity types.
///
/// Each entity is a newtype over an unsigned integer, printed as its prefix
/// followed by its index: `entity Handle(u32, "h");` prints handle 3 as `h3`.
/// `new` and `index` are also provided as inherent `const fn`s so they can be
/// called without importing [`EntityRef`].
#[macro_export]
macro_rules! entity_def {
    ($($(#[$attr:meta])* $vis:vis entity $name:ident($int:ident, $prefix:literal);)*) => {$(
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis struct $name($int);

        #[allow(dead_code)]
        impl $name {
            /// Wraps `index`, which must be below the sentinel.
            #[inline]
            $vis const fn new(index: usize) -> Self {
                debug_assert!(index < $int::MAX as usize);
                Self(index as $int)
            }

            /// Unwraps the index.
            #[inline]
            $vis const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl $crate::entity::EntityRef for $name {
            #[inline]
            fn new(index: usize) -> Self {
                $name::new(index)
            }

            #[inline]
            fn index(self) -> usize {
                $name::index(self)
            }
        }

        impl $crate::entity::Sentinel for $name {
            #[inline]
            fn sentinel() -> Self {
                Self($int::MAX)
            }

            #[inline]
            fn is_sentinel(&self) -> bool {
                self.0 == $int::MAX
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(self, f)
            }
        }
    )*};
}
