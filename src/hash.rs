//! Separate-chaining hash table addressed by compact handles.
//!
//! Every entry of a [`HashTable`] is assigned a [`Handle`] when its key is
//! first inserted. The key and value are stored in flat arrays indexed by that
//! handle, and the handle is linked into the chain of its bucket, which is a
//! list of a [`MultiList`]. The handle of an entry never changes until the
//! entry is removed, so callers can keep parallel data for entries in their own
//! `SecondaryMap<Handle, T>`.
//!
//! Keys only need to implement [`Hash`] and [`Eq`]. Floating-point keys can be
//! used by wrapping them in [`OrderedFloat`](ordered_float::OrderedFloat).

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[allow(unused_imports)]
use ordered_float::FloatCore;
use rustc_hash::FxBuildHasher;

use crate::entity::{PackedOption, SecondaryMap};
use crate::growth::GrowthStrategy;
use crate::{Error, Handle, HandleAllocator, MultiList};

entity_def! {
    /// A bucket of a [`HashTable`].
    pub entity Bucket(u32, "bucket");
}

/// Number of buckets used by [`HashTable::default`].
pub const DEFAULT_CAPACITY: usize = 16;

/// Load factor used by [`HashTable::default`].
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Largest number of buckets a table can have. `u32::MAX` is reserved.
pub const MAX_BUCKETS: usize = u32::MAX as usize;

/// A hash table mapping keys to values.
pub type HashMap<K, V, S = FxBuildHasher> = HashTable<K, V, S>;

/// A hash table holding only keys.
pub type HashSet<K, S = FxBuildHasher> = HashTable<K, (), S>;

/// Hash table with separate chaining whose entries are identified by compact
/// handles.
///
/// The bucket array grows, and every entry is rehashed, when the number of
/// entries exceeds `capacity * load_factor`. The per-handle arrays grow
/// independently when the handle high-water mark reaches their length. Both
/// follow the table's [`GrowthStrategy`]. Neither ever shrinks.
#[derive(Clone)]
pub struct HashTable<K, V, S = FxBuildHasher> {
    /// Key of every handle, `None` for free handles.
    keys: SecondaryMap<Handle, Option<K>>,

    /// Value of every handle, `None` for free handles.
    values: SecondaryMap<Handle, Option<V>>,

    /// Bucket chains. The entry array is always as long as `keys`.
    chains: MultiList<Bucket, Handle>,

    handles: HandleAllocator,
    load_factor: f32,
    strategy: GrowthStrategy,
    hash_builder: S,
}

/// Creates a per-handle array of `len` free slots.
fn free_slots<T>(len: usize) -> SecondaryMap<Handle, Option<T>> {
    SecondaryMap::from((0..len).map(|_| None).collect::<Vec<_>>())
}

/// Clones `src` into the start of `dst` and frees the rest of `dst`.
fn copy_slots<T: Clone>(dst: &mut [Option<T>], src: &[Option<T>]) {
    for (i, slot) in dst.iter_mut().enumerate() {
        match src.get(i) {
            Some(value) => slot.clone_from(value),
            None => *slot = None,
        }
    }
}

/// Computes the bucket for a key.
#[inline]
fn bucket_for<S: BuildHasher, Q: Hash + ?Sized>(
    hash_builder: &S,
    key: &Q,
    num_buckets: usize,
) -> Bucket {
    let hash = hash_builder.hash_one(key);
    Bucket::new((hash % num_buckets as u64) as usize)
}

impl<K, V, S> HashTable<K, V, S> {
    /// Creates an empty table with `initial_size` buckets and per-handle slots.
    ///
    /// Returns [`Error::InvalidConfig`] if `initial_size` is zero or if
    /// `load_factor` is not a positive finite number. The load factor must also
    /// be large enough that a single entry fits in [`MAX_BUCKETS`] buckets.
    pub fn new(initial_size: usize, load_factor: f32, strategy: GrowthStrategy) -> Result<Self, Error>
    where
        S: Default,
    {
        Self::with_hasher(initial_size, load_factor, strategy, S::default())
    }

    /// Same as [`HashTable::new`] but with an explicit hasher.
    pub fn with_hasher(
        initial_size: usize,
        load_factor: f32,
        strategy: GrowthStrategy,
        hash_builder: S,
    ) -> Result<Self, Error> {
        if initial_size == 0 {
            return Err(Error::InvalidConfig("initial size must be positive"));
        }
        if !(load_factor > 0.0 && load_factor.is_finite()) {
            return Err(Error::InvalidConfig(
                "load factor must be a positive finite number",
            ));
        }
        if f64::from(load_factor).recip() > MAX_BUCKETS as f64 {
            return Err(Error::InvalidConfig("load factor is too small"));
        }
        Ok(Self {
            keys: free_slots(initial_size),
            values: free_slots(initial_size),
            chains: MultiList::with_capacity(initial_size, initial_size),
            handles: HandleAllocator::new(),
            load_factor,
            strategy,
            hash_builder,
        })
    }

    /// Returns the number of entries in the table.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns whether the table has no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Returns the number of buckets.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.chains.num_lists()
    }

    /// Returns the length of the per-handle key and value arrays.
    #[inline]
    #[must_use]
    pub fn slot_capacity(&self) -> usize {
        self.keys.len()
    }

    /// Returns the load factor above which the bucket array grows.
    #[inline]
    #[must_use]
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Returns the growth strategy of the table.
    #[inline]
    #[must_use]
    pub fn growth_strategy(&self) -> GrowthStrategy {
        self.strategy
    }

    /// Returns the hasher used by the table.
    #[inline]
    #[must_use]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    pub(crate) fn chains(&self) -> &MultiList<Bucket, Handle> {
        &self.chains
    }

    pub(crate) fn allocator(&self) -> &HandleAllocator {
        &self.handles
    }

    /// Returns whether `handle` currently identifies an entry.
    #[inline]
    pub fn is_live(&self, handle: Handle) -> bool {
        self.handles.is_live(handle)
    }

    /// Returns the key of the entry identified by `handle`.
    #[inline]
    pub fn key(&self, handle: Handle) -> Option<&K> {
        self.keys.get(handle)?.as_ref()
    }

    /// Returns the value of the entry identified by `handle`.
    #[inline]
    pub fn value(&self, handle: Handle) -> Option<&V> {
        self.values.get(handle)?.as_ref()
    }

    /// Returns the value of the entry identified by `handle`, mutable version.
    #[inline]
    pub fn value_mut(&mut self, handle: Handle) -> Option<&mut V> {
        self.values.get_mut(handle)?.as_mut()
    }

    /// Iterates over all entries in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &K, &V)> + '_ {
        self.keys
            .iter()
            .zip(self.values.values())
            .filter_map(|((handle, key), value)| Some((handle, key.as_ref()?, value.as_ref()?)))
    }

    /// Iterates over the handles of all entries in ascending order.
    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.handles.iter()
    }

    /// Removes all entries.
    ///
    /// The bucket and per-handle arrays keep their size, and the next insertion
    /// is assigned handle 0 again.
    pub fn clear(&mut self) {
        self.handles.clear();
        self.keys.as_mut_slice().iter_mut().for_each(|k| *k = None);
        self.values.as_mut_slice().iter_mut().for_each(|v| *v = None);
        self.chains.clear();
    }

    /// Returns the length the per-handle arrays must grow to in order to have
    /// at least `min_len` slots, or `None` if they are already long enough.
    fn slots_needed(&self, min_len: usize) -> Result<Option<usize>, Error> {
        let len = self.keys.len();
        if len >= min_len {
            return Ok(None);
        }
        self.strategy.checked_growth(len, min_len).map(Some)
    }

    /// Resizes the per-handle arrays to a length computed by
    /// [`HashTable::slots_needed`]. This can't fail.
    fn grow_slots(&mut self, new_len: Option<usize>) {
        let Some(new_len) = new_len else {
            return;
        };
        trace!("Growing hash table slots from {} to {new_len}", self.keys.len());
        let exact = GrowthStrategy::Exact;
        let grown = self
            .keys
            .ensure_capacity_with(new_len, exact, || None)
            .and_then(|()| self.values.ensure_capacity_with(new_len, exact, || None))
            .and_then(|()| self.chains.ensure_entries(new_len, exact));
        debug_assert!(grown.is_ok());
    }

    /// Returns the number of buckets needed to hold `len` entries, or `None` if
    /// the current bucket array is large enough.
    fn buckets_needed(&self, len: usize, current: usize) -> Result<Option<usize>, Error> {
        let load_factor = f64::from(self.load_factor);
        if len as f64 <= current as f64 * load_factor {
            return Ok(None);
        }
        let minimum = (len as f64 / load_factor).ceil();
        if minimum > MAX_BUCKETS as f64 {
            return Err(Error::GrowthFailure {
                requested: minimum as usize,
                granted: current,
            });
        }
        let minimum = (minimum as usize).max(current + 1);
        self.strategy
            .checked_growth(current, minimum)
            .map(|granted| Some(granted.min(MAX_BUCKETS)))
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Walks the chain of the bucket `key` hashes to.
    ///
    /// Returns the bucket, the entry before the matching one in the chain and
    /// the matching entry.
    #[inline]
    fn search<Q>(&self, key: &Q) -> (Bucket, PackedOption<Handle>, PackedOption<Handle>)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = bucket_for(&self.hash_builder, key, self.capacity());
        let mut prev = PackedOption::default();
        for handle in self.chains.iter(bucket) {
            if self.keys[handle]
                .as_ref()
                .is_some_and(|k| key.eq(k.borrow()))
            {
                return (bucket, prev, handle.into());
            }
            prev = handle.into();
        }
        (bucket, prev, None.into())
    }

    /// Returns the bucket whose chain `key` belongs on.
    #[inline]
    pub(crate) fn bucket_of(&self, key: &K) -> Bucket {
        bucket_for(&self.hash_builder, key, self.capacity())
    }

    /// Returns the handle of the entry for `key`, or `None` (`NO_ENTRY`) if
    /// there is no such entry.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> PackedOption<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.search(key).2
    }

    /// Same as [`HashTable::contains_key`] but returns a plain `Option`.
    #[inline]
    pub fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.contains_key(key).expand()
    }

    /// Returns the value associated with `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.value(self.find(key)?)
    }

    /// Returns the value associated with `key`, mutable version.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.find(key)?;
        self.value_mut(handle)
    }

    /// Returns a copy of the value associated with `key`, or `default` if there
    /// is no entry for `key`.
    #[inline]
    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get(key).cloned().unwrap_or(default)
    }

    /// Inserts `value` for `key` and returns the handle of the entry.
    ///
    /// If the key is already present, its value is overwritten and its existing
    /// handle is returned. Otherwise a new handle is allocated, reusing the most
    /// recently freed one if there is any.
    ///
    /// Returns [`Error::GrowthFailure`] if the growth strategy fails to provide
    /// enough room, in which case the table is unchanged.
    pub fn insert(&mut self, key: K, value: V) -> Result<Handle, Error> {
        let (bucket, _, found) = self.search(&key);
        if let Some(handle) = found.expand() {
            self.values[handle] = Some(value);
            return Ok(handle);
        }

        // Do everything that can fail before modifying anything.
        let new_slots = match self.handles.free_count() {
            0 => self.slots_needed(self.handles.high_water() + 1)?,
            _ => None,
        };
        let new_buckets = self.buckets_needed(self.len() + 1, self.capacity())?;

        self.grow_slots(new_slots);
        let handle = self.handles.allocate();
        self.keys[handle] = Some(key);
        self.values[handle] = Some(value);
        self.chains.push_front(bucket, handle);

        if let Some(num_buckets) = new_buckets {
            self.rehash(num_buckets);
        }
        Ok(handle)
    }

    /// Rebuilds every bucket chain for a bucket array of `num_buckets`.
    fn rehash(&mut self, num_buckets: usize) {
        trace!(
            "Rehashing {} entries from {} to {num_buckets} buckets",
            self.len(),
            self.capacity()
        );
        self.chains.reset_lists(num_buckets);
        for handle in self.handles.iter() {
            let key = self.keys[handle]
                .as_ref()
                .expect("live handle without a key");
            let bucket = bucket_for(&self.hash_builder, key, num_buckets);
            self.chains.push_front(bucket, handle);
        }
    }

    /// Removes the entry for `key` and returns its former handle, or `None`
    /// (`NO_ENTRY`) if there was no such entry.
    ///
    /// The handles of other entries are unaffected.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> PackedOption<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).map(|(handle, _, _)| handle).into()
    }

    /// Removes the entry for `key` and returns its former handle along with the
    /// stored key and value.
    pub fn take<Q>(&mut self, key: &Q) -> Option<(Handle, K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (bucket, prev, found) = self.search(key);
        let handle = found.expand()?;
        self.chains.unlink(bucket, prev, handle);
        Some(self.release_slot(handle))
    }

    /// Removes the entry identified by `handle` and returns its key and value.
    ///
    /// Returns [`Error::InvalidHandle`] if `handle` doesn't identify an entry.
    pub fn remove_handle(&mut self, handle: Handle) -> Result<(K, V), Error> {
        let Some(key) = self.key(handle) else {
            return Err(Error::InvalidHandle {
                index: handle.index(),
            });
        };
        let bucket = bucket_for(&self.hash_builder, key, self.capacity());
        self.chains.remove(bucket, handle)?;
        let (_, key, value) = self.release_slot(handle);
        Ok((key, value))
    }

    /// Frees the slot of a handle which has already been unlinked.
    fn release_slot(&mut self, handle: Handle) -> (Handle, K, V) {
        let released = self.handles.release(handle);
        debug_assert!(released.is_ok());
        let key = self.keys[handle].take().expect("live handle without a key");
        let value = self.values[handle]
            .take()
            .expect("live handle without a value");
        (handle, key, value)
    }

    /// Makes `target` a deep copy of this table.
    ///
    /// Handles, keys, values and the free list are all preserved, so every
    /// handle of `self` identifies the same entry in `target`. The target takes
    /// a clone of this table's hasher but keeps its own load factor and growth
    /// strategy, and grows its arrays as needed: its bucket count ends up at
    /// least as large as this table's.
    ///
    /// Returns [`Error::GrowthFailure`] if the target's growth strategy fails,
    /// in which case neither table is modified.
    pub fn copy_into(&self, target: &mut Self) -> Result<(), Error>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        let mut num_buckets = target
            .strategy
            .checked_growth(target.capacity(), self.capacity())?;
        if let Some(n) = target.buckets_needed(self.len(), num_buckets)? {
            num_buckets = n;
        }
        let new_slots = target.slots_needed(self.keys.len())?;

        // The chains of `self` are only valid under its own hasher.
        target.hash_builder.clone_from(&self.hash_builder);
        target.grow_slots(new_slots);
        target.handles.clone_from(&self.handles);
        copy_slots(target.keys.as_mut_slice(), self.keys.as_slice());
        copy_slots(target.values.as_mut_slice(), self.values.as_slice());
        if num_buckets == self.capacity() {
            target.chains.copy_from(&self.chains);
        } else {
            target.rehash(num_buckets);
        }
        Ok(())
    }
}

impl<K, S> HashTable<K, (), S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts `key` into a set and returns the handle of its entry.
    #[inline]
    pub fn insert_key(&mut self, key: K) -> Result<Handle, Error> {
        self.insert(key, ())
    }
}

impl<K, V, S: Default> Default for HashTable<K, V, S> {
    fn default() -> Self {
        Self {
            keys: free_slots(DEFAULT_CAPACITY),
            values: free_slots(DEFAULT_CAPACITY),
            chains: MultiList::with_capacity(DEFAULT_CAPACITY, DEFAULT_CAPACITY),
            handles: HandleAllocator::new(),
            load_factor: DEFAULT_LOAD_FACTOR,
            strategy: GrowthStrategy::Double,
            hash_builder: S::default(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(_, key, value)| (key, value)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::hash::Hasher;

    use ordered_float::OrderedFloat;
    use rustc_hash::FxHasher;

    use super::*;
    use crate::debug_utils::validate_hash_table;

    fn map(initial_size: usize) -> HashMap<u32, u32> {
        HashMap::new(initial_size, 0.75, GrowthStrategy::Double).unwrap()
    }

    #[test]
    fn compact_handles() {
        let mut table = map(4);
        let handles: Vec<_> = (0..50)
            .map(|i| table.insert(i * 7, i).unwrap().index())
            .collect();
        assert_eq!(handles, (0..50).collect::<Vec<_>>());
        validate_hash_table(&table).unwrap();
    }

    #[test]
    fn scenario_128_keys() {
        let mut table = map(8);
        for i in 0..128 {
            table.insert(i, i + 100).unwrap();
        }
        assert_eq!(table.len(), 128);
        for i in 0..128 {
            assert_eq!(table.get_or(&i, u32::MAX), i + 100);
        }
        assert!(table.capacity() > 8);
        validate_hash_table(&table).unwrap();
    }

    #[test]
    fn growth_doubling() {
        let mut table = map(8);
        for i in 0..24 {
            table.insert(i, i).unwrap();
        }
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.slot_capacity(), 32);
    }

    #[test]
    fn overwrite_keeps_handle() {
        let mut table = map(8);
        let a = table.insert(5, 1).unwrap();
        let b = table.insert(6, 2).unwrap();
        assert_eq!(table.insert(5, 3).unwrap(), a);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&5), Some(&3));
        assert_eq!(table.contains_key(&6).expand(), Some(b));
    }

    #[test]
    fn remove_and_reuse() {
        let mut table = map(8);
        for i in 0..10 {
            table.insert(i, i * 2).unwrap();
        }
        let h7 = table.find(&7).unwrap();
        assert_eq!(table.remove(&3).expand(), Some(Handle::new(3)));
        assert!(table.remove(&3).is_none());
        assert!(table.contains_key(&3).is_none());
        assert_eq!(table.get_or(&3, 999), 999);
        assert_eq!(table.len(), 9);
        assert_eq!(table.find(&7), Some(h7));

        // The freed handle is reused by the next new key.
        assert_eq!(table.insert(100, 1).unwrap(), Handle::new(3));
        assert_eq!(table.key(Handle::new(3)), Some(&100));
        validate_hash_table(&table).unwrap();
    }

    #[test]
    fn remove_by_handle() {
        let mut table = map(8);
        for i in 0..20 {
            table.insert(i, i).unwrap();
        }
        assert_eq!(table.remove_handle(Handle::new(12)), Ok((12, 12)));
        assert_eq!(
            table.remove_handle(Handle::new(12)),
            Err(Error::InvalidHandle { index: 12 })
        );
        assert!(table.find(&12).is_none());
        validate_hash_table(&table).unwrap();
    }

    #[test]
    fn copy_fidelity() {
        let mut source = map(8);
        for i in 0..40 {
            source.insert(i, i + 1000).unwrap();
        }
        for i in (0..40).step_by(3) {
            source.remove(&i);
        }

        for target_size in [1, 8, 64, 256] {
            let mut target = map(target_size);
            target.insert(12345, 0).unwrap();
            source.copy_into(&mut target).unwrap();
            assert_eq!(target.len(), source.len());
            assert!(target.find(&12345).is_none());
            for (handle, key, value) in source.iter() {
                assert_eq!(target.find(key), Some(handle));
                assert_eq!(target.get(key), Some(value));
            }
            validate_hash_table(&target).unwrap();

            // Both tables hand out the same handle next.
            let mut source = source.clone();
            assert_eq!(
                source.insert(5000, 0).unwrap(),
                target.insert(5000, 0).unwrap()
            );
        }
        validate_hash_table(&source).unwrap();
    }

    /// Hasher whose output depends on a per-instance seed.
    #[derive(Clone)]
    struct Seeded(u64);

    impl BuildHasher for Seeded {
        type Hasher = FxHasher;

        fn build_hasher(&self) -> FxHasher {
            let mut hasher = FxHasher::default();
            hasher.write_u64(self.0);
            hasher
        }
    }

    #[test]
    fn copy_between_seeded_hashers() {
        let seeded = |size, seed| {
            let strategy = GrowthStrategy::Double;
            HashTable::<u32, u32, Seeded>::with_hasher(size, 0.75, strategy, Seeded(seed)).unwrap()
        };
        let mut source = seeded(8, 0);
        for i in 0..5 {
            source.insert(i, i + 100).unwrap();
        }
        // Same bucket count: the chains are copied as they are.
        for target_size in [8, 64] {
            let mut target = seeded(target_size, 7);
            source.copy_into(&mut target).unwrap();
            assert_eq!(target.hasher().0, 0);
            for i in 0..5 {
                assert_eq!(target.get_or(&i, u32::MAX), i + 100);
                assert_eq!(target.find(&i), source.find(&i));
            }
            validate_hash_table(&target).unwrap();
        }
    }

    #[test]
    fn invalid_config() {
        assert!(matches!(
            map_with(0, 0.75),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(map_with(8, 0.0), Err(Error::InvalidConfig(_))));
        assert!(matches!(map_with(8, -1.0), Err(Error::InvalidConfig(_))));
        assert!(matches!(
            map_with(8, f32::NAN),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(map_with(8, 1e-30), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn bucket_count_limit() {
        let table = map_with(8, 1e-9).unwrap();
        assert_eq!(table.buckets_needed(1, 8).unwrap(), Some(1 << 30));
        assert!(matches!(
            table.buckets_needed(5, 8),
            Err(Error::GrowthFailure { granted: 8, .. })
        ));
    }

    fn map_with(initial_size: usize, load_factor: f32) -> Result<HashMap<u32, u32>, Error> {
        HashMap::new(initial_size, load_factor, GrowthStrategy::Double)
    }

    #[test]
    fn broken_growth_leaves_table_untouched() {
        let strategy = GrowthStrategy::Custom(|current, _| current);
        let mut table: HashMap<u32, u32> = HashMap::new(2, 0.75, strategy).unwrap();
        table.insert(1, 1).unwrap();
        assert!(matches!(
            table.insert(2, 2),
            Err(Error::GrowthFailure { .. })
        ));
        assert_eq!(table.len(), 1);
        assert!(table.find(&2).is_none());
        validate_hash_table(&table).unwrap();
    }

    #[test]
    fn failed_bucket_growth_keeps_slots() {
        // Sizes up to 2 are granted, so the slot arrays could grow but the
        // bucket array can't.
        let strategy = GrowthStrategy::Custom(|current, minimum| {
            if minimum <= 2 { minimum } else { current }
        });
        let mut table: HashMap<u32, u32> = HashMap::new(1, 0.6, strategy).unwrap();
        table.insert(1, 1).unwrap();
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.slot_capacity(), 1);
        assert!(matches!(
            table.insert(2, 2),
            Err(Error::GrowthFailure { .. })
        ));
        assert_eq!(table.slot_capacity(), 1);
        assert_eq!(table.capacity(), 2);
        assert_eq!(table.len(), 1);
        validate_hash_table(&table).unwrap();
    }

    #[test]
    fn string_set() {
        let mut set: HashSet<String> = HashSet::default();
        let foo = set.insert_key("foo".into()).unwrap();
        set.insert_key("bar".into()).unwrap();
        assert_eq!(set.insert_key("foo".into()).unwrap(), foo);
        assert_eq!(set.find("foo"), Some(foo));
        assert!(set.find("baz").is_none());
        assert_eq!(set.take("foo"), Some((foo, "foo".into(), ())));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn float_keys() {
        let mut table: HashMap<OrderedFloat<f64>, u8> = HashMap::default();
        table.insert(OrderedFloat(1.5), 1).unwrap();
        table.insert(OrderedFloat(-0.25), 2).unwrap();
        assert_eq!(table.get_or(&OrderedFloat(1.5), 0), 1);
        assert_eq!(table.get_or(&OrderedFloat(2.5), 0), 0);
    }

    #[test]
    fn clear_restarts_handles() {
        let mut table = map(8);
        for i in 0..20 {
            table.insert(i, i).unwrap();
        }
        let capacity = table.capacity();
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert!(table.find(&3).is_none());
        assert_eq!(table.insert(3, 3).unwrap(), Handle::new(0));
        validate_hash_table(&table).unwrap();
    }
}
