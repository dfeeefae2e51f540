//! Optional entities stored in the space of the entity itself.
//!
//! Chain links, list heads and lookup results are all "a handle or nothing".
//! Storing them as a plain `Option<Handle>` would double their size, so the
//! containers keep a [`PackedOption`] instead, which spends the largest index
//! of the entity type on "nothing". That index is what [`to_raw`] reports as
//! [`NO_ENTRY`].
//!
//! [`to_raw`]: crate::handle::to_raw
//! [`NO_ENTRY`]: crate::NO_ENTRY

use core::fmt;

/// An entity type with one value that is never handed out as a real index.
pub trait Sentinel {
    /// Returns the value standing for "no entity".
    fn sentinel() -> Self;

    /// Returns whether this is the value returned by [`Sentinel::sentinel`].
    fn is_sentinel(&self) -> bool;
}

/// Either an entity or nothing, in the size of the entity.
///
/// Created from a `T` or an `Option<T>` with `into`, and turned back into an
/// `Option<T>` with [`PackedOption::expand`].
///
/// ```
/// use flatcoll::entity::PackedOption;
/// use flatcoll::Handle;
///
/// let head: PackedOption<Handle> = Handle::new(3).into();
/// assert_eq!(head.expand(), Some(Handle::new(3)));
/// let end: PackedOption<Handle> = None.into();
/// assert!(end.is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PackedOption<T: Sentinel>(T);

impl<T: Sentinel> PackedOption<T> {
    /// Returns `true` if there is no entity.
    #[inline]
    pub fn is_none(&self) -> bool {
        self.0.is_sentinel()
    }

    /// Returns `true` if there is an entity.
    #[inline]
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Converts to a regular `Option`.
    #[inline]
    pub fn expand(self) -> Option<T> {
        (!self.is_none()).then_some(self.0)
    }
}

impl<T: Sentinel> Default for PackedOption<T> {
    #[inline]
    fn default() -> Self {
        Self(T::sentinel())
    }
}

impl<T: Sentinel> From<T> for PackedOption<T> {
    #[inline]
    fn from(entity: T) -> Self {
        debug_assert!(!entity.is_sentinel(), "sentinel used as an entity");
        Self(entity)
    }
}

impl<T: Sentinel> From<Option<T>> for PackedOption<T> {
    #[inline]
    fn from(entity: Option<T>) -> Self {
        entity.map_or_else(Self::default, Self::from)
    }
}

impl<T: Sentinel + Copy + fmt::Debug> fmt::Debug for PackedOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expand() {
            Some(entity) => fmt::Debug::fmt(&entity, f),
            None => f.write_str("-"),
        }
    }
}
