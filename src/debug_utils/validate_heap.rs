//! Binary heap validation.

use core::cmp::Ordering;

use anyhow::{Result, bail, ensure};

use super::validate_handles;
use crate::BinaryHeap;

/// Checks that the tree and inverse index of `heap` mirror each other and that
/// no element is greater than its parent.
pub fn validate_heap<K, C>(heap: &BinaryHeap<K, C>) -> Result<()>
where
    C: Fn(&K, &K) -> Ordering,
{
    validate_handles(heap.allocator())?;
    ensure!(
        heap.allocator().len() == heap.len(),
        "Heap has {} elements but {} live handles",
        heap.len(),
        heap.allocator().len()
    );
    ensure!(
        heap.len() <= heap.capacity(),
        "Heap has {} elements but a capacity of {}",
        heap.len(),
        heap.capacity()
    );

    let tree = heap.tree();
    for (pos, &handle) in tree.iter().enumerate() {
        ensure!(heap.contains(handle), "Free {handle} in the tree at {pos}");
        ensure!(
            heap.position(handle) == Some(pos),
            "{handle} is at {pos} but its inverse is {:?}",
            heap.position(handle)
        );
        let Some(key) = heap.key(handle) else {
            bail!("Live {handle} has no key");
        };
        if pos > 0 {
            let parent = tree[(pos - 1) / 2];
            let Some(parent_key) = heap.key(parent) else {
                bail!("Live {parent} has no key");
            };
            ensure!(
                (heap.cmp())(parent_key, key) != Ordering::Less,
                "{handle} at {pos} is greater than its parent {parent}"
            );
        }
    }

    for handle in heap.allocator().free_handles() {
        ensure!(
            heap.position(handle).is_none(),
            "Free {handle} still has a tree position"
        );
        ensure!(heap.key(handle).is_none(), "Free {handle} still has a key");
    }
    Ok(())
}
