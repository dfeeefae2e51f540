//! Bitset of handles.

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use super::EntityRef;

const BITS: usize = u64::BITS as usize;

/// Set of entities with one bit per index.
///
/// [`HandleAllocator`] uses it to record which handles are live, and the
/// validators use it to detect handles that show up twice. The set covers the
/// indices below the last [`HandleSet::grow_to`]; indices past that are never
/// members.
///
/// [`HandleAllocator`]: crate::HandleAllocator
#[derive(Clone)]
pub struct HandleSet<K> {
    words: Vec<u64>,
    marker: PhantomData<K>,
}

impl<K: EntityRef> HandleSet<K> {
    /// Creates a set covering no indices.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: Vec::new(),
            marker: PhantomData,
        }
    }

    /// Makes the set cover every index below `len`.
    pub fn grow_to(&mut self, len: usize) {
        let words = len.div_ceil(BITS);
        if words > self.words.len() {
            self.words.resize(words, 0);
        }
    }

    /// Returns whether `entity` is a member.
    #[inline]
    pub fn contains(&self, entity: K) -> bool {
        let index = entity.index();
        self.words
            .get(index / BITS)
            .is_some_and(|word| word >> (index % BITS) & 1 != 0)
    }

    /// Adds `entity` and returns whether it was absent.
    ///
    /// Panics if `entity` isn't covered by the set.
    #[inline]
    #[track_caller]
    pub fn insert(&mut self, entity: K) -> bool {
        let index = entity.index();
        let word = &mut self.words[index / BITS];
        let mask = 1 << (index % BITS);
        let absent = *word & mask == 0;
        *word |= mask;
        absent
    }

    /// Removes `entity` and returns whether it was present.
    #[inline]
    #[track_caller]
    pub fn remove(&mut self, entity: K) -> bool {
        let index = entity.index();
        let word = &mut self.words[index / BITS];
        let mask = 1 << (index % BITS);
        let present = *word & mask != 0;
        *word &= !mask;
        present
    }

    /// Removes every entity but keeps the covered range.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut rest = word;
            core::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(K::new(i * BITS + bit))
            })
        })
    }
}

impl<K: EntityRef + fmt::Debug> fmt::Debug for HandleSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::Handle;

    #[test]
    fn membership() {
        let mut set = HandleSet::<Handle>::new();
        assert!(!set.contains(Handle::new(0)));
        set.grow_to(130);
        for i in [129, 0, 64, 63] {
            assert!(set.insert(Handle::new(i)));
        }
        assert!(!set.insert(Handle::new(64)));
        assert!(!set.contains(Handle::new(500)));
        assert_eq!(
            set.iter().map(Handle::index).collect::<Vec<_>>(),
            [0, 63, 64, 129]
        );

        assert!(set.remove(Handle::new(63)));
        assert!(!set.remove(Handle::new(63)));
        set.grow_to(10);
        assert!(set.contains(Handle::new(129)));
        set.clear();
        assert_eq!(set.iter().count(), 0);
    }
}
