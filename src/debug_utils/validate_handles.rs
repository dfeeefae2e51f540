//! Handle allocator validation.

use anyhow::{Result, ensure};

use crate::HandleAllocator;
use crate::entity::{EntityRef, HandleSet};

/// Checks that the free list and the set of live handles of `handles` are
/// consistent with each other.
pub fn validate_handles<K: EntityRef + core::fmt::Debug>(handles: &HandleAllocator<K>) -> Result<()> {
    let high_water = handles.high_water();
    ensure!(
        handles.free_count() <= high_water,
        "{} free handles but only {high_water} were ever allocated",
        handles.free_count()
    );

    let mut free = HandleSet::new();
    free.grow_to(high_water);
    for handle in handles.free_handles() {
        ensure!(
            handle.index() < high_water,
            "Free handle {handle:?} was never allocated"
        );
        ensure!(free.insert(handle), "{handle:?} is on the free list twice");
        ensure!(!handles.is_live(handle), "{handle:?} is both free and live");
    }

    let mut live = 0;
    for handle in handles.iter() {
        ensure!(
            handle.index() < high_water,
            "Live handle {handle:?} was never allocated"
        );
        live += 1;
    }
    ensure!(
        live == handles.len(),
        "Expected {} live handles, found {live}",
        handles.len()
    );
    ensure!(
        live + handles.free_count() == high_water,
        "Handles are leaked: {live} live, {} free, {high_water} allocated",
        handles.free_count()
    );
    Ok(())
}
