//! Many singly-linked lists threaded through two flat arrays.
//!
//! A [`MultiList`] maps every list `l` to its first entry through
//! `head_of[l]`, and every entry `e` to the entry after it through
//! `next_of[e]`. Each entry can be a member of at most one list at a time.
//! This is how the hash table implements its bucket chains, and it works just
//! as well for any other one-to-many index over handles.

use core::fmt;
use core::iter::FusedIterator;

use crate::entity::{EntityRef, PackedOption, SecondaryMap};
use crate::growth::GrowthStrategy;
use crate::{Error, Handle};

/// A set of singly-linked lists of entries of type `E`, identified by heads of
/// type `L`.
#[derive(Clone)]
pub struct MultiList<L: EntityRef, E: EntityRef = Handle> {
    head_of: SecondaryMap<L, PackedOption<E>>,
    next_of: SecondaryMap<E, PackedOption<E>>,
}

impl<L: EntityRef, E: EntityRef> MultiList<L, E> {
    /// Creates a multi-list with no lists and no entries.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head_of: SecondaryMap::new(),
            next_of: SecondaryMap::new(),
        }
    }

    /// Creates a multi-list with `num_lists` empty lists and room for
    /// `num_entries` entries.
    #[must_use]
    pub fn with_capacity(num_lists: usize, num_entries: usize) -> Self {
        Self {
            head_of: SecondaryMap::with_len(num_lists, None.into()),
            next_of: SecondaryMap::with_len(num_entries, None.into()),
        }
    }

    /// Returns the number of lists.
    #[inline]
    #[must_use]
    pub fn num_lists(&self) -> usize {
        self.head_of.len()
    }

    /// Returns the number of entry slots.
    #[inline]
    #[must_use]
    pub fn num_entries(&self) -> usize {
        self.next_of.len()
    }

    /// Grows the set of lists so that every list index below `num_lists` is
    /// valid. New lists are empty.
    pub fn ensure_lists(&mut self, num_lists: usize, strategy: GrowthStrategy) -> Result<(), Error> {
        self.head_of
            .ensure_capacity(num_lists, strategy, None.into())
    }

    /// Grows the entry array so that every entry index below `num_entries` is
    /// valid.
    pub fn ensure_entries(
        &mut self,
        num_entries: usize,
        strategy: GrowthStrategy,
    ) -> Result<(), Error> {
        self.next_of
            .ensure_capacity(num_entries, strategy, None.into())
    }

    /// Replaces all lists with exactly `num_lists` empty lists.
    ///
    /// The entry array keeps its size, but its links are stale until every
    /// entry is pushed onto a list again.
    pub fn reset_lists(&mut self, num_lists: usize) {
        self.head_of.clear_and_resize(num_lists, None.into());
    }

    /// Empties every list.
    pub fn clear(&mut self) {
        self.head_of.fill(None.into());
        self.next_of.fill(None.into());
    }

    /// Makes `self` an exact copy of the lists in `other`.
    ///
    /// `self` must already have at least as many entry slots as `other`. Extra
    /// slots are left unlinked.
    pub fn copy_from(&mut self, other: &Self) {
        assert!(self.num_entries() >= other.num_entries());
        self.head_of.clone_from(&other.head_of);
        let (copied, rest) = self
            .next_of
            .as_mut_slice()
            .split_at_mut(other.num_entries());
        copied.copy_from_slice(other.next_of.as_slice());
        rest.fill(None.into());
    }

    /// Returns the first entry of `list`.
    #[inline]
    pub fn first(&self, list: L) -> PackedOption<E> {
        self.head_of[list]
    }

    /// Returns the entry following `entry` on its list.
    #[inline]
    pub fn next(&self, entry: E) -> PackedOption<E> {
        self.next_of[entry]
    }

    /// Inserts `entry` at the front of `list`.
    ///
    /// `entry` must not currently be a member of any list.
    #[inline]
    pub fn push_front(&mut self, list: L, entry: E) {
        self.next_of[entry] = self.head_of[list];
        self.head_of[list] = entry.into();
    }

    /// Unlinks `entry` from `list`, given the entry preceding it on that list
    /// (or `None` if `entry` is the first one).
    ///
    /// This is O(1) and trusts the caller: use [`MultiList::remove`] when the
    /// predecessor isn't known.
    #[inline]
    pub fn unlink(&mut self, list: L, prev: PackedOption<E>, entry: E) {
        let next = self.next_of[entry];
        match prev.expand() {
            Some(prev) => {
                debug_assert!(self.next_of[prev] == PackedOption::from(entry));
                self.next_of[prev] = next;
            }
            None => {
                debug_assert!(self.head_of[list] == PackedOption::from(entry));
                self.head_of[list] = next;
            }
        }
        self.next_of[entry] = None.into();
    }

    /// Removes `entry` from `list`.
    ///
    /// Returns [`Error::NotInList`] if `list` doesn't exist or `entry` is not
    /// one of its members, in which case nothing is modified.
    pub fn remove(&mut self, list: L, entry: E) -> Result<(), Error> {
        let not_in_list = Error::NotInList {
            list: list.index(),
            entry: entry.index(),
        };
        let Some(&head) = self.head_of.get(list) else {
            return Err(not_in_list);
        };
        let mut prev = PackedOption::default();
        let mut cur = head;
        while let Some(e) = cur.expand() {
            if e == entry {
                self.unlink(list, prev, entry);
                return Ok(());
            }
            prev = e.into();
            cur = self.next_of[e];
        }
        Err(not_in_list)
    }

    /// Iterates over the entries of `list`, most recently pushed first.
    #[inline]
    pub fn iter(&self, list: L) -> Iter<'_, L, E> {
        Iter {
            list: self,
            next: self.head_of[list],
        }
    }
}

impl<L: EntityRef, E: EntityRef> Default for MultiList<L, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, E> fmt::Debug for MultiList<L, E>
where
    L: EntityRef + fmt::Debug,
    E: EntityRef + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.head_of
                    .keys()
                    .filter(|&list| self.head_of[list].is_some())
                    .map(|list| (list, self.iter(list))),
            )
            .finish()
    }
}

/// Iterator over the entries of one list of a [`MultiList`].
pub struct Iter<'a, L: EntityRef, E: EntityRef> {
    list: &'a MultiList<L, E>,
    next: PackedOption<E>,
}

impl<L: EntityRef, E: EntityRef> Clone for Iter<'_, L, E> {
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            next: self.next,
        }
    }
}

impl<L: EntityRef, E: EntityRef> Iterator for Iter<'_, L, E> {
    type Item = E;

    #[inline]
    fn next(&mut self) -> Option<E> {
        let entry = self.next.expand()?;
        self.next = self.list.next_of[entry];
        Some(entry)
    }
}

impl<L: EntityRef, E: EntityRef> FusedIterator for Iter<'_, L, E> {}

impl<L: EntityRef, E: EntityRef + fmt::Debug> fmt::Debug for Iter<'_, L, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    entity_def! {
        entity List(u32, "list");
    }

    fn h(index: usize) -> Handle {
        Handle::new(index)
    }

    fn members(list: &MultiList<List>, l: List) -> Vec<usize> {
        list.iter(l).map(|e| e.index()).collect()
    }

    #[test]
    fn push_front_prepends() {
        let mut list = MultiList::<List>::with_capacity(2, 8);
        list.push_front(List::new(0), h(1));
        list.push_front(List::new(0), h(4));
        list.push_front(List::new(1), h(2));
        list.push_front(List::new(0), h(7));
        assert_eq!(members(&list, List::new(0)), [7, 4, 1]);
        assert_eq!(members(&list, List::new(1)), [2]);
        assert_eq!(list.first(List::new(1)).expand(), Some(h(2)));
        assert!(list.next(h(2)).is_none());
    }

    #[test]
    fn remove_head_middle_tail() {
        let mut list = MultiList::<List>::with_capacity(1, 8);
        let l = List::new(0);
        for i in 0..5 {
            list.push_front(l, h(i));
        }
        list.remove(l, h(4)).unwrap();
        assert_eq!(members(&list, l), [3, 2, 1, 0]);
        list.remove(l, h(2)).unwrap();
        assert_eq!(members(&list, l), [3, 1, 0]);
        list.remove(l, h(0)).unwrap();
        assert_eq!(members(&list, l), [3, 1]);

        // A removed entry can be pushed onto a list again.
        list.push_front(l, h(0));
        assert_eq!(members(&list, l), [0, 3, 1]);
    }

    #[test]
    fn remove_not_in_list() {
        let mut list = MultiList::<List>::with_capacity(2, 8);
        list.push_front(List::new(0), h(3));
        list.push_front(List::new(1), h(5));

        // Wrong head.
        assert_eq!(
            list.remove(List::new(1), h(3)),
            Err(Error::NotInList { list: 1, entry: 3 })
        );
        // Nonexistent value.
        assert_eq!(
            list.remove(List::new(0), h(6)),
            Err(Error::NotInList { list: 0, entry: 6 })
        );
        // Nonexistent list.
        assert!(list.remove(List::new(9), h(3)).is_err());

        assert_eq!(members(&list, List::new(0)), [3]);
        assert_eq!(members(&list, List::new(1)), [5]);
    }

    #[test]
    fn grow_and_reset() {
        let mut list = MultiList::<List>::new();
        list.ensure_lists(3, GrowthStrategy::Double).unwrap();
        list.ensure_entries(5, GrowthStrategy::Double).unwrap();
        assert_eq!(list.num_lists(), 4);
        assert_eq!(list.num_entries(), 8);
        list.push_front(List::new(3), h(7));
        list.ensure_lists(6, GrowthStrategy::Double).unwrap();
        assert_eq!(members(&list, List::new(3)), [7]);
        assert!(list.first(List::new(5)).is_none());

        list.reset_lists(2);
        assert_eq!(list.num_lists(), 2);
        assert!(list.first(List::new(1)).is_none());
        assert_eq!(list.num_entries(), 8);
    }
}
