//! Checks `HashTable` against `std::collections::HashMap`.

#![no_main]

use std::collections::HashMap as StdHashMap;

use arbitrary::Arbitrary;
use flatcoll::debug_utils;
use flatcoll::{Handle, HashMap};
use flatcoll_fuzz::TestCase;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(u8, u16),
    Remove(u8),
    RemoveHandle(Handle),
    Get(u8),
    CopyInto(u8),
    Clear,
}

fuzz_target!(|t: TestCase<Op>| {
    log::trace!("Test case: {t:?}");

    let mut table: HashMap<u8, u16> =
        HashMap::new(t.config.initial_capacity, 0.75, t.config.strategy).unwrap();
    let mut model: StdHashMap<u8, (Handle, u16)> = StdHashMap::new();

    for op in t.ops {
        match op {
            Op::Insert(key, value) => {
                let handle = table.insert(key, value).unwrap();
                if let Some(&(old, _)) = model.get(&key) {
                    assert_eq!(handle, old);
                } else {
                    assert!(model.values().all(|&(h, _)| h != handle));
                }
                model.insert(key, (handle, value));
            }
            Op::Remove(key) => {
                let removed = table.remove(&key).expand();
                assert_eq!(removed, model.remove(&key).map(|(h, _)| h));
            }
            Op::RemoveHandle(handle) => {
                let key = model
                    .iter()
                    .find(|(_, &(h, _))| h == handle)
                    .map(|(&k, _)| k);
                match key {
                    Some(key) => {
                        let (_, value) = model.remove(&key).unwrap();
                        assert_eq!(table.remove_handle(handle).unwrap(), (key, value));
                    }
                    None => assert!(table.remove_handle(handle).is_err()),
                }
            }
            Op::Get(key) => {
                assert_eq!(table.get(&key), model.get(&key).map(|(_, v)| v));
                assert_eq!(table.find(&key), model.get(&key).map(|&(h, _)| h));
            }
            Op::CopyInto(size) => {
                let mut target = HashMap::new(usize::from(size) + 1, 0.5, t.config.strategy)
                    .unwrap();
                table.copy_into(&mut target).unwrap();
                debug_utils::validate_hash_table(&target).unwrap();
                table = target;
            }
            Op::Clear => {
                table.clear();
                model.clear();
            }
        }
        debug_utils::validate_hash_table(&table).unwrap();
        assert_eq!(table.len(), model.len());
    }
});
