//! An optional process-wide singleton.
//!
//! The core [`crate::SegPoolAllocator`] holds no internal synchronization —
//! callers who want a single shared instance across threads wrap it in a
//! lock themselves. This module is that wrapping, done once, the same way
//! the teacher's own global-config cell splits on the `std` feature: a
//! `std::sync::OnceLock` when `std` is available, and `once_cell`'s
//! `alloc`-only `race::OnceBox` otherwise.

use spin::Mutex;

use crate::allocator::SegPoolAllocator;
use crate::config::AllocatorConfig;
use crate::error::InitError;

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        static INSTANCE: std::sync::OnceLock<Mutex<SegPoolAllocator>> = std::sync::OnceLock::new();
    } else {
        static INSTANCE: once_cell::race::OnceBox<Mutex<SegPoolAllocator>> =
            once_cell::race::OnceBox::new();
    }
}

/// Returns the process-wide allocator, creating it with the default
/// [`AllocatorConfig`] on first access.
///
/// The returned allocator starts Uninitialised; call
/// [`SegPoolAllocator::init`] through the lock before allocating.
pub fn global() -> &'static Mutex<SegPoolAllocator> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "std")] {
            INSTANCE.get_or_init(|| Mutex::new(SegPoolAllocator::new()))
        } else {
            INSTANCE.get_or_init(|| alloc::boxed::Box::new(Mutex::new(SegPoolAllocator::new())))
        }
    }
}

/// Initialises the process-wide allocator with a custom [`AllocatorConfig`],
/// if it has not been accessed yet.
///
/// Returns `false` if the singleton was already created (by a prior call to
/// [`global`] or this function), in which case its configuration is
/// unchanged. This mirrors `OnceLock::set`'s race-loses semantics rather
/// than panicking, since which thread wins a startup race is rarely
/// something calling code can control.
pub fn configure_global(config: AllocatorConfig) -> bool {
    cfg_if::cfg_if! {
        if #[cfg(feature = "std")] {
            INSTANCE.set(Mutex::new(SegPoolAllocator::with_config(config))).is_ok()
        } else {
            INSTANCE
                .set(alloc::boxed::Box::new(Mutex::new(SegPoolAllocator::with_config(config))))
                .is_ok()
        }
    }
}

/// Convenience wrapper: initialises the process-wide allocator's pool layout
/// under its lock.
pub fn init_global(block_sizes: &[usize]) -> Result<(), InitError> {
    global().lock().init(block_sizes)
}

/// Convenience wrapper: allocates from the process-wide allocator.
pub fn alloc_global(n: usize) -> *mut u8 {
    global().lock().alloc(n)
}

/// Convenience wrapper: frees into the process-wide allocator.
///
/// Safe for the same reason [`SegPoolAllocator::free`] is: a null, out of
/// range, or non-slot-aligned pointer is a no-op rather than undefined
/// behaviour.
pub fn free_global(ptr: *mut u8) {
    global().lock().free(ptr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_starts_uninitialised() {
        // Uses its own process in practice; here we only check the lock is
        // reachable and the allocator within starts Uninitialised when this
        // is the first access in the test binary.
        let guard = global().lock();
        let _ = guard.is_initialised();
    }
}
