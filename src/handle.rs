//! Compact handles and free-list handle allocation.
//!
//! A [`Handle`] identifies an item stored in one of the containers of this
//! crate. Handles are allocated by a [`HandleAllocator`], which reuses
//! released handles (most recently released first) before extending its
//! high-water mark. As a result, handles stay dense: a container which has
//! never had anything removed from it uses exactly the handles `0..len`.

use alloc::vec::Vec;

use crate::Error;
use crate::entity::{EntityRef, HandleSet, PackedOption};

entity_def! {
    /// A compact integer handle identifying an item in a container.
    ///
    /// The handle stays valid until the item is removed, after which it may be
    /// handed out again for a different item.
    pub entity Handle(u32, "h");
}

/// Raw value used to represent the absence of a handle when handles are
/// exchanged as plain signed integers.
pub const NO_ENTRY: i32 = -1;

/// Converts an optional handle to its raw signed representation, with `None`
/// becoming [`NO_ENTRY`].
#[inline]
#[must_use]
pub fn to_raw(entry: PackedOption<Handle>) -> i32 {
    match entry.expand() {
        Some(handle) => handle.index() as i32,
        None => NO_ENTRY,
    }
}

/// Converts a raw signed handle back into an optional handle. Any negative
/// value is treated as [`NO_ENTRY`].
#[inline]
#[must_use]
pub fn from_raw(raw: i32) -> PackedOption<Handle> {
    if raw < 0 {
        None.into()
    } else {
        Handle::new(raw as usize).into()
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Handle {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Handle::new(u.arbitrary::<u16>()? as usize))
    }
}

/// Allocator of compact handles with a LIFO free list.
///
/// The allocator only hands out indices; it is up to the owning container to
/// grow its per-handle arrays so that they cover [`HandleAllocator::high_water`].
#[derive(Clone, Debug)]
pub struct HandleAllocator<K: EntityRef = Handle> {
    /// Released handles, the most recently released one last.
    free: Vec<K>,

    /// Handles which are currently allocated.
    live: HandleSet<K>,

    /// Lowest index which has never been handed out.
    next_unused: usize,
}

impl<K: EntityRef> HandleAllocator<K> {
    /// Creates an allocator with no live handles.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            free: Vec::new(),
            live: HandleSet::new(),
            next_unused: 0,
        }
    }

    /// Allocates a handle, reusing the most recently released one if there is
    /// any.
    pub fn allocate(&mut self) -> K {
        let handle = match self.free.pop() {
            Some(handle) => handle,
            None => {
                let handle = K::new(self.next_unused);
                self.next_unused += 1;
                self.live.grow_to(self.next_unused);
                handle
            }
        };
        self.live.insert(handle);
        handle
    }

    /// Releases a handle so that it can be reused by a later allocation.
    ///
    /// Returns [`Error::InvalidHandle`] if the handle is not currently
    /// allocated, in which case the allocator is unchanged.
    pub fn release(&mut self, handle: K) -> Result<(), Error> {
        if !self.live.contains(handle) {
            return Err(Error::InvalidHandle {
                index: handle.index(),
            });
        }
        self.live.remove(handle);
        self.free.push(handle);
        Ok(())
    }

    /// Returns whether `handle` is currently allocated.
    #[inline]
    pub fn is_live(&self, handle: K) -> bool {
        self.live.contains(handle)
    }

    /// Returns the number of allocated handles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.next_unused - self.free.len()
    }

    /// Returns whether no handles are allocated.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns one past the highest index ever handed out since the last
    /// [`HandleAllocator::clear`].
    ///
    /// Every allocated handle has an index below this value.
    #[inline]
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.next_unused
    }

    /// Returns the number of released handles waiting to be reused.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Iterates over the free list, starting with the handle that the next
    /// allocation will return.
    pub fn free_handles(&self) -> impl Iterator<Item = K> + '_ {
        self.free.iter().rev().copied()
    }

    /// Iterates over all allocated handles in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.live.iter()
    }

    /// Releases every handle and resets the high-water mark so that the next
    /// allocation returns handle 0 again.
    pub fn clear(&mut self) {
        self.free.clear();
        self.live.clear();
        self.next_unused = 0;
    }
}

impl<K: EntityRef> Default for HandleAllocator<K> {
    fn default() -> Self {
        Self::new()
    }
}
