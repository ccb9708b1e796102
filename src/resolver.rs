//! Size-to-pool resolution: binary search, last-used-pool cache, and the
//! forward-only overflow scan.
//!
//! This module only reads [`PoolHeader::block_size`]/[`PoolHeader::has_free`]
//! — it never touches the free list itself — so it can be exercised and
//! tested independently of the unsafe [`crate::freelist`] core.

use crate::header::PoolHeader;

/// Finds the pool that should serve an allocation of `n` bytes, updating
/// `cache` to remember the choice for the next call with the same `n`.
///
/// `headers` must be sorted by `block_size`, strictly increasing — every
/// caller in this crate upholds that via `init`'s validation (I2).
pub fn resolve(headers: &[PoolHeader], n: usize, cache: &mut Option<usize>) -> Option<usize> {
    if headers.is_empty() {
        return None;
    }

    let mut idx = match *cache {
        Some(c) if c < headers.len() && headers[c].block_size == n => c,
        _ => first_index_with_size_at_least(headers, n)?,
    };

    // Overflow rule: walk forward only, never backward, until we find a pool
    // that both fits (block_size >= n) and has a free slot.
    while idx < headers.len() && (headers[idx].block_size < n || !headers[idx].has_free()) {
        idx += 1;
    }

    if idx >= headers.len() {
        return None;
    }

    *cache = Some(idx);
    Some(idx)
}

/// Binary search for the smallest index with `block_size >= n`.
fn first_index_with_size_at_least(headers: &[PoolHeader], n: usize) -> Option<usize> {
    let mut lo = 0usize;
    let mut hi = headers.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if headers[mid].block_size < n {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    if lo < headers.len() {
        Some(lo)
    } else {
        None
    }
}
