//! The intrusive free list.
//!
//! Every unallocated slot's first word is reused as a link to the next free
//! slot in the same pool, so pools carry no metadata overhead beyond the
//! [`crate::header::PoolHeader`] itself. This module is the only place that
//! reads or writes those link words; everything above it deals in plain
//! `usize` addresses.
//!
//! # Safety
//!
//! Every function here requires the caller to guarantee that `stride` is at
//! least `core::mem::size_of::<usize>()` and that every address it is asked
//! to read or write lies within a single pool's slab and is a multiple of
//! `stride` from that slab's base. [`crate::header::PoolHeader::contains`]
//! and [`crate::header::PoolHeader::is_slot_aligned`] are how callers
//! establish that before crossing into this module.

use core::ptr;

/// Threads `slot_count` consecutive slots of `stride` bytes starting at
/// `pool_base` into a singly-linked free list, slot 0 first.
///
/// Returns the address of the head of the resulting list (`pool_base`), or
/// `0` if `slot_count` is zero.
///
/// # Safety
/// `pool_base` must be valid for `slot_count * stride` writable bytes,
/// word-aligned, and not concurrently accessed.
pub unsafe fn thread_initial_list(pool_base: usize, stride: usize, slot_count: usize) -> usize {
    if slot_count == 0 {
        return 0;
    }

    for i in 0..slot_count {
        let slot_addr = pool_base + i * stride;
        let next = if i + 1 < slot_count {
            pool_base + (i + 1) * stride
        } else {
            0
        };
        // SAFETY: slot_addr is within the caller-guaranteed [pool_base, pool_base +
        // slot_count*stride) range, word-aligned since pool_base and stride both are.
        unsafe {
            write_link(slot_addr, next);
        }
    }

    pool_base
}

/// Pops the head of a free list, returning its address and advancing `head`
/// to the popped slot's stored link (or `0` if the list is now empty).
///
/// Returns `None` without touching memory if `*head == 0`.
///
/// # Safety
/// `*head`, if nonzero, must be a valid, currently-free slot address
/// previously produced by [`thread_initial_list`] or [`push_head`].
pub unsafe fn pop_head(head: &mut usize) -> Option<usize> {
    let slot = *head;
    if slot == 0 {
        return None;
    }

    // SAFETY: slot is nonzero and, by the caller's contract, a valid free slot.
    let next = unsafe { read_link(slot) };
    *head = next;
    Some(slot)
}

/// Pushes `slot_addr` onto the head of a free list.
///
/// # Safety
/// `slot_addr` must be valid for a word-sized write and not already present
/// in this or any other free list (double-push corrupts the list exactly
/// like a double-free).
pub unsafe fn push_head(head: &mut usize, slot_addr: usize) {
    // SAFETY: slot_addr is caller-guaranteed writable for one word.
    unsafe {
        write_link(slot_addr, *head);
    }
    *head = slot_addr;
}

#[inline]
unsafe fn read_link(addr: usize) -> usize {
    // SAFETY: delegated to the caller of the function that called us.
    unsafe { ptr::read(addr as *const usize) }
}

#[inline]
unsafe fn write_link(addr: usize, value: usize) {
    // SAFETY: delegated to the caller of the function that called us.
    unsafe {
        ptr::write(addr as *mut usize, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threads_and_drains_in_fifo_order() {
        let stride = core::mem::size_of::<usize>();
        let mut buf = vec![0u8; stride * 4];
        let base = buf.as_mut_ptr() as usize;

        let mut head = unsafe { thread_initial_list(base, stride, 4) };
        assert_eq!(head, base);

        let mut popped = Vec::new();
        while let Some(slot) = unsafe { pop_head(&mut head) } {
            popped.push(slot);
        }
        assert_eq!(popped, vec![base, base + stride, base + 2 * stride, base + 3 * stride]);
        assert_eq!(head, 0);
    }

    #[test]
    fn push_then_pop_is_lifo() {
        let stride = core::mem::size_of::<usize>();
        let mut buf = vec![0u8; stride * 2];
        let base = buf.as_mut_ptr() as usize;

        let mut head = 0usize;
        unsafe {
            push_head(&mut head, base);
            push_head(&mut head, base + stride);
        }

        assert_eq!(unsafe { pop_head(&mut head) }, Some(base + stride));
        assert_eq!(unsafe { pop_head(&mut head) }, Some(base));
        assert_eq!(unsafe { pop_head(&mut head) }, None);
    }

    #[test]
    fn empty_slot_count_yields_null_head() {
        assert_eq!(unsafe { thread_initial_list(0x1000, 8, 0) }, 0);
    }
}
