//! Arena for variable-length byte blocks addressed by compact handles.
//!
//! Blocks are appended to a single contiguous byte buffer. Removing a block
//! only frees its handle: the bytes stay behind as garbage until
//! [`ByteBlockArena::compact`] slides the surviving blocks down over them.

use alloc::vec::Vec;
use core::fmt;

use crate::entity::SecondaryMap;
use crate::growth::{self, GrowthStrategy};
use crate::sort::sort;
use crate::{Error, Handle, HandleAllocator};

/// Storage for byte blocks of arbitrary length.
#[derive(Clone)]
pub struct ByteBlockArena {
    /// Backing buffer. Its length is the data capacity of the arena.
    data: Vec<u8>,

    /// Offset of the block of every handle in `data`.
    start: SecondaryMap<Handle, usize>,

    /// Length of the block of every handle.
    lens: SecondaryMap<Handle, usize>,

    /// Offset at which the next block is written.
    cur_ptr: usize,

    /// Total length of all live blocks.
    live_bytes: usize,

    handles: HandleAllocator,
    strategy: GrowthStrategy,
}

impl ByteBlockArena {
    /// Creates an empty arena with room for `data_capacity` bytes and
    /// `num_handles` blocks.
    #[must_use]
    pub fn new(data_capacity: usize, num_handles: usize, strategy: GrowthStrategy) -> Self {
        Self {
            data: alloc::vec![0; data_capacity],
            start: SecondaryMap::with_len(num_handles, 0),
            lens: SecondaryMap::with_len(num_handles, 0),
            cur_ptr: 0,
            live_bytes: 0,
            handles: HandleAllocator::new(),
            strategy,
        }
    }

    /// Returns the number of live blocks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns whether the arena has no live blocks.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns the number of bytes written since the last compaction,
    /// including those of removed blocks.
    #[inline]
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.cur_ptr
    }

    /// Returns the size of the backing buffer.
    #[inline]
    #[must_use]
    pub fn data_capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of bytes held by removed blocks which
    /// [`ByteBlockArena::compact`] would reclaim.
    #[inline]
    #[must_use]
    pub fn garbage_bytes(&self) -> usize {
        self.cur_ptr - self.live_bytes
    }

    pub(crate) fn allocator(&self) -> &HandleAllocator {
        &self.handles
    }

    /// Returns whether `handle` identifies a live block.
    #[inline]
    pub fn contains(&self, handle: Handle) -> bool {
        self.handles.is_live(handle)
    }

    /// Returns the byte range of `handle` in the backing buffer.
    #[inline]
    pub(crate) fn span(&self, handle: Handle) -> Option<(usize, usize)> {
        self.contains(handle)
            .then(|| (self.start[handle], self.lens[handle]))
    }

    /// Stores a copy of `bytes` as a new block and returns its handle.
    ///
    /// Returns [`Error::GrowthFailure`] if the growth strategy fails to provide
    /// enough room, in which case the arena is unchanged.
    pub fn insert(&mut self, bytes: &[u8]) -> Result<Handle, Error> {
        let end = self.cur_ptr + bytes.len();
        let data_len = self.strategy.checked_growth(self.data.len(), end)?;
        let meta_len = match self.handles.free_count() {
            0 => self
                .strategy
                .checked_growth(self.start.len(), self.handles.high_water() + 1)?,
            _ => self.start.len(),
        };

        let exact = GrowthStrategy::Exact;
        growth::ensure_capacity(&mut self.data, data_len, exact, 0)?;
        self.start.ensure_capacity(meta_len, exact, 0)?;
        self.lens.ensure_capacity(meta_len, exact, 0)?;

        let handle = self.handles.allocate();
        self.data[self.cur_ptr..end].copy_from_slice(bytes);
        self.start[handle] = self.cur_ptr;
        self.lens[handle] = bytes.len();
        self.cur_ptr = end;
        self.live_bytes += bytes.len();
        Ok(handle)
    }

    /// Stores the UTF-8 bytes of `s` as a new block.
    #[inline]
    pub fn insert_str(&mut self, s: &str) -> Result<Handle, Error> {
        self.insert(s.as_bytes())
    }

    /// Stores a copy of `bytes[off..off + len]` as a new block.
    ///
    /// Returns [`Error::OutOfBounds`] if the range doesn't fit in `bytes`.
    pub fn insert_range(&mut self, bytes: &[u8], off: usize, len: usize) -> Result<Handle, Error> {
        let range = off
            .checked_add(len)
            .and_then(|end| bytes.get(off..end))
            .ok_or(Error::OutOfBounds {
                end: off.saturating_add(len),
                len: bytes.len(),
            })?;
        self.insert(range)
    }

    /// Returns the contents of the block identified by `handle`, or `None` if
    /// it doesn't identify a live block.
    #[inline]
    pub fn get_block(&self, handle: Handle) -> Option<&[u8]> {
        let (start, len) = self.span(handle)?;
        Some(&self.data[start..start + len])
    }

    /// Returns the contents of the block identified by `handle` as a string, or
    /// `None` if there is no such block or it isn't valid UTF-8.
    #[inline]
    pub fn get_str(&self, handle: Handle) -> Option<&str> {
        core::str::from_utf8(self.get_block(handle)?).ok()
    }

    /// Removes the block identified by `handle`. Returns `false` if it doesn't
    /// identify a live block.
    ///
    /// The bytes of the block are not reclaimed until the next
    /// [`ByteBlockArena::compact`].
    pub fn remove(&mut self, handle: Handle) -> bool {
        if self.handles.release(handle).is_err() {
            return false;
        }
        self.live_bytes -= self.lens[handle];
        true
    }

    /// Moves all live blocks to the start of the buffer, reclaiming the space
    /// of removed blocks.
    ///
    /// Handles and block contents are unchanged and the buffer is not resized.
    pub fn compact(&mut self) {
        trace!(
            "Compacting arena: {} blocks, {} garbage bytes",
            self.len(),
            self.garbage_bytes()
        );
        let mut handles: Vec<Handle> = self.handles.iter().collect();
        let mut starts: Vec<usize> = handles.iter().map(|&h| self.start[h]).collect();
        sort(&mut starts, |a, b| a.cmp(b), &mut [&mut handles])
            .expect("handles and offsets have the same length");

        let mut dst = 0;
        for (handle, src) in handles.into_iter().zip(starts) {
            let len = self.lens[handle];
            if src != dst {
                self.data.copy_within(src..src + len, dst);
                self.start[handle] = dst;
            }
            dst += len;
        }
        debug_assert_eq!(dst, self.live_bytes);
        self.cur_ptr = dst;
    }

    /// Removes all blocks. The backing buffer keeps its size and the next block
    /// is assigned handle 0 again.
    pub fn clear(&mut self) {
        self.handles.clear();
        self.cur_ptr = 0;
        self.live_bytes = 0;
    }

    /// Iterates over all live blocks in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &[u8])> + '_ {
        self.handles.iter().map(|handle| {
            let start = self.start[handle];
            (handle, &self.data[start..start + self.lens[handle]])
        })
    }
}

impl Default for ByteBlockArena {
    fn default() -> Self {
        Self::new(0, 0, GrowthStrategy::Double)
    }
}

impl fmt::Debug for ByteBlockArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::debug_utils::validate_arena;

    #[test]
    fn compaction_scenario() {
        let mut arena = ByteBlockArena::new(13, 4, GrowthStrategy::Double);
        let handles: Vec<_> = ["foo", "bar", "baz", "quux"]
            .iter()
            .map(|s| arena.insert_str(s).unwrap())
            .collect();
        assert_eq!(handles, (0..4).map(Handle::new).collect::<Vec<_>>());
        assert_eq!(arena.data_capacity(), 13);

        assert!(arena.remove(handles[2]));
        assert!(!arena.remove(handles[2]));
        assert_eq!(arena.get_block(handles[2]), None);
        assert_eq!(arena.used_bytes(), 13);
        assert_eq!(arena.garbage_bytes(), 3);
        validate_arena(&arena).unwrap();

        arena.compact();
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.used_bytes(), 10);
        assert_eq!(arena.garbage_bytes(), 0);
        assert_eq!(arena.get_str(handles[0]), Some("foo"));
        assert_eq!(arena.get_str(handles[1]), Some("bar"));
        assert_eq!(arena.get_str(handles[3]), Some("quux"));
        validate_arena(&arena).unwrap();

        let zap = arena.insert_str("zap").unwrap();
        assert_eq!(zap, handles[2]);
        assert_eq!(arena.get_block(zap), Some(&b"zap"[..]));
        assert_eq!(arena.data_capacity(), 13);
        validate_arena(&arena).unwrap();
    }

    #[test]
    fn freed_bytes_not_reused_before_compaction() {
        let mut arena = ByteBlockArena::new(8, 2, GrowthStrategy::Double);
        let a = arena.insert(b"abcd").unwrap();
        arena.insert(b"efgh").unwrap();
        arena.remove(a);
        assert_eq!(arena.insert(b"ijkl").unwrap(), a);
        assert_eq!(arena.used_bytes(), 12);
        assert_eq!(arena.data_capacity(), 16);
        assert_eq!(arena.get_block(a), Some(&b"ijkl"[..]));
    }

    #[test]
    fn compaction_preserves_out_of_order_blocks() {
        let mut arena = ByteBlockArena::default();
        let blocks: Vec<_> = (0u8..20)
            .map(|i| {
                let block: Vec<u8> = (0..i).collect();
                (arena.insert(&block).unwrap(), block)
            })
            .collect();
        for &(handle, _) in blocks.iter().step_by(2) {
            arena.remove(handle);
        }
        // Refill some of the freed handles at the end of the buffer.
        let late = arena.insert(b"late").unwrap();
        let also_late = arena.insert(b"also late").unwrap();
        arena.compact();
        validate_arena(&arena).unwrap();
        assert_eq!(arena.get_block(late), Some(&b"late"[..]));
        assert_eq!(arena.get_block(also_late), Some(&b"also late"[..]));
        for (handle, block) in blocks.iter().skip(1).step_by(2) {
            assert_eq!(arena.get_block(*handle), Some(&block[..]));
        }
        assert_eq!(arena.garbage_bytes(), 0);
    }

    #[test]
    fn compact_handles_and_growth() {
        let mut arena = ByteBlockArena::new(8, 8, GrowthStrategy::Double);
        for i in 0..24 {
            assert_eq!(arena.insert(&[i]).unwrap(), Handle::new(i as usize));
        }
        assert_eq!(arena.data_capacity(), 32);
        assert_eq!(arena.iter().count(), 24);
    }

    #[test]
    fn failed_handle_growth_keeps_data() {
        let strategy = GrowthStrategy::Custom(|current, minimum| {
            if minimum <= 4 { minimum } else { current }
        });
        let mut arena = ByteBlockArena::new(0, 4, strategy);
        for _ in 0..4 {
            arena.insert(&[]).unwrap();
        }
        // The 3 bytes would fit the strategy but a fifth handle doesn't.
        assert!(matches!(
            arena.insert(b"abc"),
            Err(Error::GrowthFailure {
                requested: 5,
                granted: 4
            })
        ));
        assert_eq!(arena.data_capacity(), 0);
        assert_eq!(arena.used_bytes(), 0);
        assert_eq!(arena.len(), 4);
        validate_arena(&arena).unwrap();
    }

    #[test]
    fn insert_range() {
        let mut arena = ByteBlockArena::default();
        let h = arena.insert_range(b"hello world", 6, 5).unwrap();
        assert_eq!(arena.get_str(h), Some("world"));
        assert_eq!(
            arena.insert_range(b"hello", 3, 5),
            Err(Error::OutOfBounds { end: 8, len: 5 })
        );
        assert_eq!(arena.len(), 1);

        let empty = arena.insert(&[]).unwrap();
        assert_eq!(arena.get_block(empty), Some(&[][..]));
    }

    #[test]
    fn clear() {
        let mut arena = ByteBlockArena::new(4, 1, GrowthStrategy::Exact);
        arena.insert(b"xyz").unwrap();
        arena.insert(b"w").unwrap();
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.used_bytes(), 0);
        assert_eq!(arena.insert(b"v").unwrap(), Handle::new(0));
        assert_eq!(arena.data_capacity(), 4);
    }
}
