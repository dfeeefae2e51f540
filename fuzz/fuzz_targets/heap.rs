//! Checks that `BinaryHeap` keeps heap order and returns elements in
//! comparator order under arbitrary insertions and removals.

#![no_main]

use std::collections::HashMap;

use arbitrary::Arbitrary;
use flatcoll::debug_utils;
use flatcoll::{BinaryHeap, Direction, Handle};
use flatcoll_fuzz::TestCase;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(i16),
    RemoveGreatest,
    Remove(Handle),
    ReplaceKey(Handle, i16),
    Clear,
}

fuzz_target!(|input: (Direction, TestCase<Op>)| {
    let (direction, t) = input;
    log::trace!("Test case: {direction:?} {t:?}");

    let mut heap = BinaryHeap::with_direction(
        t.config.initial_capacity,
        t.config.strategy,
        direction,
    );
    let mut model: HashMap<Handle, i16> = HashMap::new();
    let greatest = |model: &HashMap<Handle, i16>| match direction {
        Direction::Ascending => model.values().max().copied(),
        Direction::Descending => model.values().min().copied(),
    };

    for op in t.ops {
        match op {
            Op::Insert(key) => {
                let handle = heap.insert(key).unwrap();
                assert!(model.insert(handle, key).is_none());
            }
            Op::RemoveGreatest => {
                let expected = greatest(&model);
                let removed = heap.remove_greatest();
                assert_eq!(removed.map(|(_, k)| k), expected);
                if let Some((handle, key)) = removed {
                    assert_eq!(model.remove(&handle), Some(key));
                }
            }
            Op::Remove(handle) => {
                let removed = heap.remove(handle).expand();
                assert_eq!(removed.is_some(), model.remove(&handle).is_some());
            }
            Op::ReplaceKey(handle, key) => match model.get_mut(&handle) {
                Some(old) => {
                    assert_eq!(heap.replace_key(handle, key).unwrap(), *old);
                    *old = key;
                }
                None => assert!(heap.replace_key(handle, key).is_err()),
            },
            Op::Clear => {
                heap.clear();
                model.clear();
            }
        }
        debug_utils::validate_heap(&heap).unwrap();
        assert_eq!(heap.len(), model.len());
        assert_eq!(heap.peek().copied(), greatest(&model));
    }

    // Draining yields every remaining key in comparator order.
    let mut expected: Vec<i16> = model.into_values().collect();
    expected.sort_unstable_by(|a, b| direction.compare(b, a));
    let mut drained = vec![];
    while let Some((_, key)) = heap.remove_greatest() {
        drained.push(key);
    }
    assert_eq!(drained, expected);
});
