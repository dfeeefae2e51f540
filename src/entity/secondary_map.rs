//! Flat arrays indexed by entity references.

use alloc::vec::Vec;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use core::{fmt, slice};

use super::EntityRef;
use crate::growth::{self, GrowthStrategy};
use crate::Error;

/// A mapping `K -> V` for densely indexed entity references.
///
/// The `SecondaryMap` data structure uses the dense index space to implement a
/// map with a vector. It doesn't allocate entity references itself: it is used
/// to associate data with handles handed out by some other container, which is
/// how callers attach parallel per-item data to the contents of a
/// [`HashTable`] or a [`BinaryHeap`].
///
/// The map does not track if an entry for a key has been inserted or not.
/// Instead, every index below [`SecondaryMap::len`] holds a value, and the map
/// is grown in advance with [`SecondaryMap::ensure_capacity`].
///
/// [`HashTable`]: crate::HashTable
/// [`BinaryHeap`]: crate::BinaryHeap
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct SecondaryMap<K, V>
where
    K: EntityRef,
{
    elems: Vec<V>,
    marker: PhantomData<K>,
}

impl<K, V> SecondaryMap<K, V>
where
    K: EntityRef,
{
    /// Create a new empty map.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elems: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Create a new map holding `len` clones of `fill`.
    #[inline]
    #[must_use]
    pub fn with_len(len: usize, fill: V) -> Self
    where
        V: Clone,
    {
        Self {
            elems: alloc::vec![fill; len],
            marker: PhantomData,
        }
    }

    /// Returns the number of entities this map holds a value for.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Returns whether the map holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Get the element at `k` if it exists.
    #[inline]
    pub fn get(&self, k: K) -> Option<&V> {
        self.elems.get(k.index())
    }

    /// Get the element at `k` if it exists, mutable version.
    #[inline]
    pub fn get_mut(&mut self, k: K) -> Option<&mut V> {
        self.elems.get_mut(k.index())
    }

    /// Grows the map so that it holds a value for at least every entity with an
    /// index below `min_len`.
    ///
    /// The new length is chosen by `strategy` and new slots are filled with
    /// clones of `fill`. Existing values are not modified.
    #[inline]
    pub fn ensure_capacity(
        &mut self,
        min_len: usize,
        strategy: GrowthStrategy,
        fill: V,
    ) -> Result<(), Error>
    where
        V: Clone,
    {
        growth::ensure_capacity(&mut self.elems, min_len, strategy, fill)
    }

    /// Same as [`SecondaryMap::ensure_capacity`] but new slots are initialized
    /// by calling `f`.
    #[inline]
    pub fn ensure_capacity_with(
        &mut self,
        min_len: usize,
        strategy: GrowthStrategy,
        f: impl FnMut() -> V,
    ) -> Result<(), Error> {
        growth::ensure_capacity_with(&mut self.elems, min_len, strategy, f)
    }

    /// Overwrites every value in the map with a clone of `value`, keeping the
    /// length unchanged.
    #[inline]
    pub fn fill(&mut self, value: V)
    where
        V: Clone,
    {
        self.elems.fill(value);
    }

    /// Removes all elements from the map and resizes it to exactly `len`
    /// clones of `fill`.
    #[inline]
    pub fn clear_and_resize(&mut self, len: usize, fill: V)
    where
        V: Clone,
    {
        self.elems.clear();
        self.elems.resize(len, fill);
    }

    /// Swaps the values of two entities.
    #[inline]
    #[track_caller]
    pub fn swap(&mut self, a: K, b: K) {
        self.elems.swap(a.index(), b.index());
    }

    /// Iterates over every key and its value in index order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.elems.iter().enumerate().map(|(i, v)| (K::new(i), v))
    }

    /// Iterates over every key below [`SecondaryMap::len`].
    pub fn keys(&self) -> impl Iterator<Item = K> + use<K, V> {
        (0..self.elems.len()).map(K::new)
    }

    /// Iterate over all the values in this map.
    #[inline]
    pub fn values(&self) -> slice::Iter<'_, V> {
        self.elems.iter()
    }

    /// Returns the values of the map as a slice, in index order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[V] {
        &self.elems
    }

    /// Returns the values of the map as a mutable slice, in index order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [V] {
        &mut self.elems
    }
}

impl<K, V> Default for SecondaryMap<K, V>
where
    K: EntityRef,
{
    #[inline]
    fn default() -> SecondaryMap<K, V> {
        SecondaryMap::new()
    }
}

impl<K, V> Index<K> for SecondaryMap<K, V>
where
    K: EntityRef,
{
    type Output = V;

    #[inline]
    #[track_caller]
    fn index(&self, k: K) -> &V {
        &self.elems[k.index()]
    }
}

impl<K, V> IndexMut<K> for SecondaryMap<K, V>
where
    K: EntityRef,
{
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, k: K) -> &mut V {
        &mut self.elems[k.index()]
    }
}

impl<K, V> From<Vec<V>> for SecondaryMap<K, V>
where
    K: EntityRef,
{
    #[inline]
    fn from(elems: Vec<V>) -> Self {
        Self {
            elems,
            marker: PhantomData,
        }
    }
}

impl<K, V> fmt::Debug for SecondaryMap<K, V>
where
    K: EntityRef + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
