//! Hash table validation.

use core::fmt;
use core::hash::{BuildHasher, Hash};

use anyhow::{Result, bail, ensure};
use hashbrown::HashSet;

use super::validate_handles;
use crate::entity::HandleSet;
use crate::hash::{Bucket, HashTable};

/// Checks the internal consistency of `table`:
///
/// - every live handle has a key and a value, and every free one has neither
/// - every live handle is on exactly one chain, the one its key hashes to
/// - no two entries have the same key
/// - the number of entries respects the load factor.
pub fn validate_hash_table<K, V, S>(table: &HashTable<K, V, S>) -> Result<()>
where
    K: Hash + Eq + fmt::Debug,
    S: BuildHasher,
{
    let handles = table.allocator();
    validate_handles(handles)?;
    ensure!(
        handles.high_water() <= table.slot_capacity(),
        "{} handles allocated but only {} slots",
        handles.high_water(),
        table.slot_capacity()
    );
    ensure!(
        table.chains().num_entries() == table.slot_capacity(),
        "Chain entry array has {} slots, expected {}",
        table.chains().num_entries(),
        table.slot_capacity()
    );

    for handle in handles.iter() {
        ensure!(table.key(handle).is_some(), "Live {handle} has no key");
        ensure!(table.value(handle).is_some(), "Live {handle} has no value");
    }
    for handle in handles.free_handles() {
        ensure!(table.key(handle).is_none(), "Free {handle} still has a key");
        ensure!(table.value(handle).is_none(), "Free {handle} still has a value");
    }

    let mut chained = HandleSet::new();
    chained.grow_to(table.slot_capacity());
    let mut num_chained = 0;
    for index in 0..table.capacity() {
        let bucket = Bucket::new(index);
        for handle in table.chains().iter(bucket) {
            if !chained.insert(handle) {
                bail!("{handle} appears twice in the chains (at {bucket})");
            }
            num_chained += 1;
            let Some(key) = table.key(handle) else {
                bail!("Free {handle} is on the chain of {bucket}");
            };
            let expected = table.bucket_of(key);
            ensure!(
                expected == bucket,
                "{handle} with key {key:?} is in {bucket} instead of {expected}"
            );
        }
    }
    ensure!(
        num_chained == table.len(),
        "{num_chained} handles on chains but the table has {} entries",
        table.len()
    );

    let mut keys = HashSet::with_capacity(table.len());
    for (handle, key, _) in table.iter() {
        ensure!(keys.insert(key), "Duplicate key {key:?} at {handle}");
    }

    ensure!(
        table.len() as f64 <= table.capacity() as f64 * f64::from(table.load_factor()),
        "{} entries exceed the load factor {} of {} buckets",
        table.len(),
        table.load_factor(),
        table.capacity()
    );
    Ok(())
}
