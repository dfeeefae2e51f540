//! Checks `ByteBlockArena` against a map of handles to byte vectors.

#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use flatcoll::debug_utils;
use flatcoll::{ByteBlockArena, Handle};
use flatcoll_fuzz::TestCase;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(Vec<u8>),
    Remove(Handle),
    Compact,
    Clear,
}

fuzz_target!(|t: TestCase<Op>| {
    log::trace!("Test case: {t:?}");

    let mut arena = ByteBlockArena::new(
        t.config.initial_capacity,
        t.config.initial_capacity,
        t.config.strategy,
    );
    let mut model: HashMap<Handle, Vec<u8>> = HashMap::new();

    for op in t.ops {
        match op {
            Op::Insert(bytes) => {
                let handle = arena.insert(&bytes).unwrap();
                assert!(model.insert(handle, bytes).is_none());
            }
            Op::Remove(handle) => {
                assert_eq!(arena.remove(handle), model.remove(&handle).is_some());
                assert_eq!(arena.get_block(handle), None);
            }
            Op::Compact => {
                let capacity = arena.data_capacity();
                arena.compact();
                assert_eq!(arena.garbage_bytes(), 0);
                assert_eq!(arena.data_capacity(), capacity);
            }
            Op::Clear => {
                arena.clear();
                model.clear();
            }
        }
        debug_utils::validate_arena(&arena).unwrap();
        assert_eq!(arena.len(), model.len());
        for (&handle, bytes) in &model {
            assert_eq!(arena.get_block(handle), Some(&bytes[..]));
        }
    }
});
