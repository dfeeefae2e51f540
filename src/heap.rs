//! Binary heap with removal of arbitrary elements by handle.
//!
//! The heap is a complete binary tree of handles stored in level order in a
//! flat array. Alongside it, an inverse index maps every live handle to its
//! current position in the tree, which makes it possible to remove (or rekey)
//! any element in O(log n) given only its handle.
//!
//! The element at the root is the greatest one according to the comparator, so
//! an ascending comparator gives a max-heap and a descending one gives a
//! min-heap.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::compare::Direction;
use crate::entity::{PackedOption, Sentinel, SecondaryMap};
use crate::growth::{self, GrowthStrategy};
use crate::{Error, Handle, HandleAllocator};

/// Position of a handle which is not in the tree.
const NOT_IN_TREE: u32 = u32::MAX;

/// Priority queue whose elements are identified by compact handles.
pub struct BinaryHeap<K, C = fn(&K, &K) -> Ordering> {
    /// Key of every handle, `None` for free handles.
    keys: SecondaryMap<Handle, Option<K>>,

    /// Handles in heap order. Only the first `len` positions are in use.
    tree: Vec<Handle>,

    /// Position of every live handle in `tree`.
    inverse: SecondaryMap<Handle, u32>,

    len: usize,
    handles: HandleAllocator,
    strategy: GrowthStrategy,
    cmp: C,
}

impl<K: Ord> BinaryHeap<K> {
    /// Creates an empty heap ordered by the natural order of `K` in the given
    /// direction.
    ///
    /// [`Direction::Ascending`] puts the largest key at the root.
    #[must_use]
    pub fn with_direction(
        initial_capacity: usize,
        strategy: GrowthStrategy,
        direction: Direction,
    ) -> Self {
        Self::new(initial_capacity, strategy, direction.comparator())
    }
}

impl<K, C> BinaryHeap<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Creates an empty heap with room for `initial_capacity` elements.
    ///
    /// The root of the heap is always the greatest element according to
    /// `cmp`.
    pub fn new(initial_capacity: usize, strategy: GrowthStrategy, cmp: C) -> Self {
        Self {
            keys: SecondaryMap::from((0..initial_capacity).map(|_| None).collect::<Vec<_>>()),
            tree: alloc::vec![Handle::sentinel(); initial_capacity],
            inverse: SecondaryMap::with_len(initial_capacity, NOT_IN_TREE),
            len: 0,
            handles: HandleAllocator::new(),
            strategy,
            cmp,
        }
    }

    /// Returns the number of elements in the heap.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the heap is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the heap can hold before growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.len()
    }

    /// Returns the comparator of the heap.
    #[inline]
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    pub(crate) fn allocator(&self) -> &HandleAllocator {
        &self.handles
    }

    /// Returns whether `handle` identifies an element of the heap.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.handles.is_live(handle)
    }

    /// Returns the key of the element identified by `handle`.
    #[inline]
    pub fn key(&self, handle: Handle) -> Option<&K> {
        self.keys.get(handle)?.as_ref()
    }

    /// Returns the position of `handle` in the level-order tree array.
    #[inline]
    pub fn position(&self, handle: Handle) -> Option<usize> {
        let pos = *self.inverse.get(handle)?;
        (pos != NOT_IN_TREE).then_some(pos as usize)
    }

    /// Returns the handles of the heap in level order.
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &[Handle] {
        &self.tree[..self.len]
    }

    /// Returns the greatest element, or `None` if the heap is empty.
    #[inline]
    pub fn peek(&self) -> Option<&K> {
        self.key(self.peek_handle().expand()?)
    }

    /// Returns the handle of the greatest element, or `None` (`NO_ENTRY`) if
    /// the heap is empty.
    #[inline]
    pub fn peek_handle(&self) -> PackedOption<Handle> {
        if self.len == 0 {
            None.into()
        } else {
            self.tree[0].into()
        }
    }

    /// Iterates over the elements of the heap in level order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &K)> + '_ {
        self.tree().iter().map(|&handle| (handle, self.live_key(handle)))
    }

    /// Inserts `key` into the heap and returns its handle.
    ///
    /// Returns [`Error::GrowthFailure`] if the heap is full and its growth
    /// strategy fails to provide more room, in which case the heap is
    /// unchanged.
    pub fn insert(&mut self, key: K) -> Result<Handle, Error> {
        if self.len == self.capacity() {
            self.grow()?;
        }
        let handle = self.handles.allocate();
        self.keys[handle] = Some(key);
        let pos = self.len;
        self.len += 1;
        self.place(pos, handle);
        self.sift_up(pos);
        Ok(handle)
    }

    /// Removes the greatest element and returns its former handle and key, or
    /// `None` if the heap is empty.
    pub fn remove_greatest(&mut self) -> Option<(Handle, K)> {
        if self.len == 0 {
            return None;
        }
        Some(self.remove_at(0))
    }

    /// Removes the element identified by `handle` and returns the handle, or
    /// `None` (`NO_ENTRY`) if it doesn't identify an element of the heap.
    #[inline]
    pub fn remove(&mut self, handle: Handle) -> PackedOption<Handle> {
        self.take(handle).map(|_| handle).into()
    }

    /// Removes the element identified by `handle` and returns its key.
    pub fn take(&mut self, handle: Handle) -> Option<K> {
        let pos = self.position(handle)?;
        let (_, key) = self.remove_at(pos);
        Some(key)
    }

    /// Replaces the key of the element identified by `handle` and moves it to
    /// its new place in the heap. Returns the previous key.
    ///
    /// Returns [`Error::InvalidHandle`] if `handle` doesn't identify an element
    /// of the heap.
    pub fn replace_key(&mut self, handle: Handle, key: K) -> Result<K, Error> {
        let Some(pos) = self.position(handle) else {
            return Err(Error::InvalidHandle {
                index: handle.index(),
            });
        };
        let old = self.keys[handle].replace(key);
        self.restore(pos);
        Ok(old.expect("live handle without a key"))
    }

    /// Removes all elements. The capacity is unchanged and the next insertion
    /// is assigned handle 0 again.
    pub fn clear(&mut self) {
        for pos in 0..self.len {
            let handle = self.tree[pos];
            self.keys[handle] = None;
            self.inverse[handle] = NOT_IN_TREE;
            self.tree[pos] = Handle::sentinel();
        }
        self.len = 0;
        self.handles.clear();
    }

    /// Grows `keys`, `tree` and `inverse` together.
    fn grow(&mut self) -> Result<(), Error> {
        let capacity = self.capacity();
        let new_capacity = self.strategy.checked_growth(capacity, capacity + 1)?;
        trace!("Growing heap from {capacity} to {new_capacity}");
        growth::ensure_capacity(
            &mut self.tree,
            new_capacity,
            GrowthStrategy::Exact,
            Handle::sentinel(),
        )?;
        self.keys
            .ensure_capacity_with(new_capacity, GrowthStrategy::Exact, || None)?;
        self.inverse
            .ensure_capacity(new_capacity, GrowthStrategy::Exact, NOT_IN_TREE)
    }

    #[inline]
    fn live_key(&self, handle: Handle) -> &K {
        self.keys[handle]
            .as_ref()
            .expect("live handle without a key")
    }

    #[inline]
    fn less(&self, a: Handle, b: Handle) -> bool {
        (self.cmp)(self.live_key(a), self.live_key(b)) == Ordering::Less
    }

    /// Puts `handle` at position `pos` of the tree.
    #[inline]
    fn place(&mut self, pos: usize, handle: Handle) {
        self.tree[pos] = handle;
        self.inverse[handle] = pos as u32;
    }

    /// Moves the element at `pos` towards the root while it is greater than
    /// its parent. Returns whether it moved.
    fn sift_up(&mut self, mut pos: usize) -> bool {
        let handle = self.tree[pos];
        let start = pos;
        while pos > 0 {
            let parent = (pos - 1) / 2;
            let parent_handle = self.tree[parent];
            if !self.less(parent_handle, handle) {
                break;
            }
            self.place(pos, parent_handle);
            pos = parent;
        }
        self.place(pos, handle);
        pos != start
    }

    /// Moves the element at `pos` towards the leaves while one of its children
    /// is greater than it.
    fn sift_down(&mut self, mut pos: usize) {
        let handle = self.tree[pos];
        loop {
            let left = 2 * pos + 1;
            if left >= self.len {
                break;
            }
            let right = left + 1;
            let mut child = left;
            if right < self.len && self.less(self.tree[left], self.tree[right]) {
                child = right;
            }
            let child_handle = self.tree[child];
            if !self.less(handle, child_handle) {
                break;
            }
            self.place(pos, child_handle);
            pos = child;
        }
        self.place(pos, handle);
    }

    /// Restores heap order for an element whose key may be out of place.
    ///
    /// Only one of the two directions can actually move it.
    fn restore(&mut self, pos: usize) {
        if !self.sift_up(pos) {
            self.sift_down(pos);
        }
    }

    /// Removes the element at `pos`, filling the hole with the last element.
    fn remove_at(&mut self, pos: usize) -> (Handle, K) {
        let handle = self.tree[pos];
        self.len -= 1;
        let last = self.tree[self.len];
        self.tree[self.len] = Handle::sentinel();
        self.inverse[handle] = NOT_IN_TREE;
        if pos < self.len {
            self.place(pos, last);
            self.restore(pos);
        }
        let released = self.handles.release(handle);
        debug_assert!(released.is_ok());
        let key = self.keys[handle].take().expect("live handle without a key");
        (handle, key)
    }
}

impl<K: Clone, C: Clone> Clone for BinaryHeap<K, C> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            tree: self.tree.clone(),
            inverse: self.inverse.clone(),
            len: self.len,
            handles: self.handles.clone(),
            strategy: self.strategy,
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for BinaryHeap<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::debug_utils::validate_heap;

    /// Deterministic pseudo-random sequence for shuffling test inputs.
    fn lcg(seed: &mut u64) -> u64 {
        *seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *seed >> 33
    }

    fn max_heap(initial_capacity: usize) -> BinaryHeap<u64> {
        BinaryHeap::with_direction(initial_capacity, GrowthStrategy::Double, Direction::Ascending)
    }

    fn drain(heap: &mut BinaryHeap<u64>) -> Vec<u64> {
        let mut out = Vec::new();
        while let Some((_, key)) = heap.remove_greatest() {
            out.push(key);
        }
        out
    }

    #[test]
    fn compact_handles() {
        let mut heap = max_heap(2);
        for i in 0..20 {
            assert_eq!(heap.insert(i * 13 % 7).unwrap(), Handle::new(i as usize));
        }
        validate_heap(&heap).unwrap();
    }

    #[test]
    fn growth_doubling() {
        let mut heap = max_heap(8);
        for i in 0..24 {
            heap.insert(i).unwrap();
        }
        assert_eq!(heap.capacity(), 32);

        let mut heap = max_heap(1024);
        for i in 0..1025 {
            heap.insert(i).unwrap();
        }
        assert_eq!(heap.capacity(), 2048);
    }

    #[test]
    fn remove_greatest_is_sorted() {
        let mut seed = 1;
        let mut heap = max_heap(4);
        let mut expected = Vec::new();
        for _ in 0..500 {
            let key = lcg(&mut seed) % 100;
            heap.insert(key).unwrap();
            expected.push(key);
        }
        validate_heap(&heap).unwrap();
        assert_eq!(heap.peek(), expected.iter().max());
        expected.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(drain(&mut heap), expected);
        assert!(heap.is_empty());
        assert!(heap.remove_greatest().is_none());
        assert!(heap.peek().is_none());
    }

    #[test]
    fn remove_by_handle() {
        let mut seed = 7;
        let mut heap = max_heap(8);
        let mut live = Vec::new();
        for _ in 0..200 {
            let key = lcg(&mut seed) % 1000;
            live.push((heap.insert(key).unwrap(), key));
        }
        // Remove every third element by handle.
        let mut remaining = Vec::new();
        for (i, &(handle, key)) in live.iter().enumerate() {
            if i % 3 == 0 {
                assert_eq!(heap.remove(handle).expand(), Some(handle));
                assert!(heap.remove(handle).is_none());
                assert!(!heap.contains(handle));
                validate_heap(&heap).unwrap();
            } else {
                remaining.push(key);
            }
        }
        remaining.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(drain(&mut heap), remaining);
    }

    #[test]
    fn min_heap() {
        let mut heap = BinaryHeap::with_direction(4, GrowthStrategy::Exact, Direction::Descending);
        for key in [5, 3, 9, 1, 7] {
            heap.insert(key).unwrap();
        }
        assert_eq!(heap.peek(), Some(&1));
        assert_eq!(heap.remove_greatest(), Some((Handle::new(3), 1)));
        assert_eq!(heap.peek(), Some(&3));
        assert_eq!(heap.capacity(), 5);
    }

    #[test]
    fn replace_key() {
        let mut heap = max_heap(8);
        let handles: Vec<_> = (0..10).map(|i| heap.insert(i * 10).unwrap()).collect();
        assert_eq!(heap.replace_key(handles[2], 1000), Ok(20));
        assert_eq!(heap.peek_handle().expand(), Some(handles[2]));
        assert_eq!(heap.replace_key(handles[9], 0), Ok(90));
        validate_heap(&heap).unwrap();
        assert_eq!(drain(&mut heap), [1000, 80, 70, 60, 50, 40, 30, 10, 0, 0]);
        assert_eq!(
            heap.replace_key(handles[0], 1),
            Err(Error::InvalidHandle { index: 0 })
        );
    }

    #[test]
    fn reuse_after_remove() {
        let mut heap = max_heap(4);
        let a = heap.insert(1).unwrap();
        heap.insert(2).unwrap();
        heap.remove(a);
        assert_eq!(heap.insert(3).unwrap(), a);
        assert_eq!(heap.key(a), Some(&3));
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.insert(4).unwrap(), Handle::new(0));
        validate_heap(&heap).unwrap();
    }

    #[test]
    fn float_keys() {
        let mut heap = BinaryHeap::new(4, GrowthStrategy::Double, Direction::Ascending.f64_comparator());
        for key in [0.5, -2.0, 3.25, 1.0] {
            heap.insert(key).unwrap();
        }
        assert_eq!(heap.remove_greatest().map(|(_, k)| k), Some(3.25));
        assert_eq!(heap.remove_greatest().map(|(_, k)| k), Some(1.0));
    }

    #[test]
    fn broken_growth() {
        let mut heap = BinaryHeap::with_direction(
            1,
            GrowthStrategy::Custom(|current, _| current),
            Direction::Ascending,
        );
        heap.insert(1u8).unwrap();
        assert!(matches!(heap.insert(2), Err(Error::GrowthFailure { .. })));
        assert_eq!(heap.len(), 1);
        validate_heap(&heap).unwrap();
    }
}
