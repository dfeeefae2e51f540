//! Byte block arena validation.

use alloc::vec::Vec;

use anyhow::{Result, bail, ensure};

use super::validate_handles;
use crate::ByteBlockArena;

/// Checks that the live blocks of `arena` lie within the written part of the
/// buffer without overlapping, and that the garbage accounting adds up.
pub fn validate_arena(arena: &ByteBlockArena) -> Result<()> {
    validate_handles(arena.allocator())?;
    ensure!(
        arena.used_bytes() <= arena.data_capacity(),
        "Write pointer {} is past the end of the buffer ({})",
        arena.used_bytes(),
        arena.data_capacity()
    );

    let mut spans = Vec::with_capacity(arena.len());
    for handle in arena.allocator().iter() {
        let Some((start, len)) = arena.span(handle) else {
            bail!("Live {handle} has no block");
        };
        ensure!(
            start + len <= arena.used_bytes(),
            "Block of {handle} ends at {} past the write pointer {}",
            start + len,
            arena.used_bytes()
        );
        spans.push((start, len, handle));
    }
    spans.sort_unstable();

    let mut live_bytes = 0;
    let mut prev_end = 0;
    for &(start, len, handle) in &spans {
        ensure!(
            start >= prev_end,
            "Block of {handle} at {start} overlaps the previous block ending at {prev_end}"
        );
        prev_end = start + len;
        live_bytes += len;
    }
    ensure!(
        live_bytes + arena.garbage_bytes() == arena.used_bytes(),
        "{live_bytes} live bytes and {} garbage bytes don't add up to {}",
        arena.garbage_bytes(),
        arena.used_bytes()
    );
    Ok(())
}
