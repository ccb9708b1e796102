//! The layout planner, and the `init`/`alloc`/`free` operations built on top
//! of [`crate::resolver`] and [`crate::freelist`].

use alloc::boxed::Box;
use core::fmt;

use crate::config::{AllocatorConfig, HEAP_SIZE, N_MAX};
use crate::error::InitError;
use crate::freelist::{pop_head, push_head, thread_initial_list};
use crate::header::PoolHeader;
use crate::resolver::resolve;
use crate::utils::{align_down, align_up, word_size};

#[cfg(feature = "logging")]
use tracing::{trace, warn};

/// Two-word on-disk size of a `PoolHeader`, as the layout formula in the
/// data model accounts for it (one pointer + one size per pool).
const fn header_table_entry_size() -> usize {
    2 * word_size()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialised,
    Initialised,
}

#[derive(Debug, Clone, Copy, Default)]
struct Stats {
    total_allocs: u64,
    total_deallocs: u64,
}

/// A tunable segregated-block pool allocator over a fixed-capacity,
/// statically sized heap region.
///
/// See the crate-level documentation for the layout and free-list
/// discipline this type implements.
pub struct SegPoolAllocator {
    heap: Box<[u8; HEAP_SIZE]>,
    state: State,
    headers: [PoolHeader; N_MAX],
    pool_count: usize,
    pools_base: usize,
    slab_size: usize,
    last_used: Option<usize>,
    config: AllocatorConfig,
    stats: Stats,
}

impl SegPoolAllocator {
    /// Creates a new, Uninitialised allocator with the default configuration.
    ///
    /// This allocates the `H`-byte heap region immediately (so that its
    /// address never changes again, even if this value is later moved into
    /// a `static`); no pool layout exists until [`init`](Self::init) runs.
    pub fn new() -> Self {
        Self::with_config(AllocatorConfig::default())
    }

    /// Creates a new, Uninitialised allocator with a custom [`AllocatorConfig`].
    pub fn with_config(config: AllocatorConfig) -> Self {
        Self {
            heap: Box::new([0u8; HEAP_SIZE]),
            state: State::Uninitialised,
            headers: [PoolHeader::EMPTY; N_MAX],
            pool_count: 0,
            pools_base: 0,
            slab_size: 0,
            last_used: None,
            config,
            stats: Stats::default(),
        }
    }

    /// Whether `init` has completed successfully.
    pub fn is_initialised(&self) -> bool {
        self.state == State::Initialised
    }

    /// Partitions the heap region into `block_sizes.len()` pools and threads
    /// each pool's free list.
    ///
    /// `block_sizes` must be non-empty, no longer than [`N_MAX`], strictly
    /// increasing, with no zero entries, and every entry must fit (once
    /// aligned to the word size) inside the per-pool slab size derived from
    /// `H` and `N`. On any validation failure this returns `Err` and leaves
    /// the allocator exactly as it was (Uninitialised, or already
    /// Initialised if called a second time).
    pub fn init(&mut self, block_sizes: &[usize]) -> Result<(), InitError> {
        if self.state == State::Initialised {
            log_init_failure(&InitError::AlreadyInitialised);
            return Err(InitError::AlreadyInitialised);
        }

        let n = block_sizes.len();
        if n == 0 {
            log_init_failure(&InitError::EmptySizes);
            return Err(InitError::EmptySizes);
        }
        if n > N_MAX {
            let err = InitError::TooManyPools { count: n, n_max: N_MAX };
            log_init_failure(&err);
            return Err(err);
        }

        for (index, &size) in block_sizes.iter().enumerate() {
            if size == 0 {
                let err = InitError::ZeroSizedBlock { index };
                log_init_failure(&err);
                return Err(err);
            }
            if index > 0 && block_sizes[index - 1] >= size {
                let err = InitError::NotStrictlyIncreasing {
                    index,
                    prev: block_sizes[index - 1],
                    next: size,
                };
                log_init_failure(&err);
                return Err(err);
            }
        }

        let w = word_size();
        let slab_size = align_down(HEAP_SIZE / n - header_table_entry_size(), w);

        for (index, &size) in block_sizes.iter().enumerate() {
            let aligned = align_up(size, w);
            if aligned > slab_size {
                let err = InitError::BlockExceedsSlab { index, aligned, slab: slab_size };
                log_init_failure(&err);
                return Err(err);
            }
        }

        // All validation passed: commit. From here on every step is
        // infallible, so the allocator can never be left half-built.
        let heap_base = self.heap.as_ptr() as usize;

        let mut headers = [PoolHeader::EMPTY; N_MAX];
        for (index, &size) in block_sizes.iter().enumerate() {
            let stride = align_up(size, w);
            let slot_count = slab_size / stride;
            let pool_base = heap_base + index * slab_size;

            // SAFETY: pool_base..pool_base + slot_count*stride lies within
            // this allocator's own `heap` buffer (index < n and slab_size is
            // the validated per-pool share of HEAP_SIZE), is word-aligned
            // since heap_base and slab_size both are, and is not concurrently
            // accessed (we hold `&mut self`).
            let head = unsafe { thread_initial_list(pool_base, stride, slot_count) };

            headers[index] = PoolHeader {
                block_size: size,
                stride,
                pool_base,
                slot_count,
                next_free: head,
            };
        }

        self.headers = headers;
        self.pool_count = n;
        self.pools_base = heap_base;
        self.slab_size = slab_size;
        self.last_used = None;
        self.state = State::Initialised;
        Ok(())
    }

    /// Allocates `n` bytes, returning a word-aligned pointer to at least `n`
    /// writable bytes, or a null pointer if the request cannot be served
    /// (zero-sized request, uninitialised allocator, unsupported size, or
    /// every sufficiently large pool is exhausted).
    pub fn alloc(&mut self, n: usize) -> *mut u8 {
        if self.state == State::Uninitialised || n == 0 {
            return core::ptr::null_mut();
        }

        let Some(idx) = resolve(&self.headers[..self.pool_count], n, &mut self.last_used) else {
            log_exhaustion(n);
            return core::ptr::null_mut();
        };

        let header = &mut self.headers[idx];
        // SAFETY: `header.next_free` is either 0 or an address produced by
        // `thread_initial_list`/`push_head` for this exact pool, since the
        // resolver only ever selects pools by index into this table and
        // `free` is the only other writer of `next_free` (also address-
        // validated, see `free` below).
        let slot = unsafe { pop_head(&mut header.next_free) }
            .expect("resolver guarantees next_free is nonzero");

        if let Some(pattern) = self.config.fill_on_alloc {
            // SAFETY: slot is a valid, just-popped free block of header.stride bytes.
            unsafe {
                core::ptr::write_bytes(slot as *mut u8, pattern, header.stride);
            }
        }

        if self.config.track_stats {
            self.stats.total_allocs += 1;
        }

        slot as *mut u8
    }

    /// Returns a pointer previously produced by [`alloc`](Self::alloc) to its
    /// pool's free list.
    ///
    /// A null pointer, a pointer outside the pools region, a pointer that is
    /// not on a slot boundary, or calling this before `init` are all silent
    /// no-ops. Freeing a pointer that was not produced by `alloc` but
    /// happens to be in range and slot-aligned (including a double-free) is
    /// undefined behaviour that this allocator makes no attempt to detect.
    pub fn free(&mut self, ptr: *mut u8) {
        if self.state == State::Uninitialised || ptr.is_null() {
            return;
        }

        let addr = ptr as usize;
        let Some(idx) = self.pool_index_for_address(addr) else {
            return;
        };

        let header = &mut self.headers[idx];
        if !header.contains(addr) || !header.is_slot_aligned(addr) {
            return;
        }

        if let Some(pattern) = self.config.fill_on_free {
            // SAFETY: addr was just validated as a slot-aligned address inside pool idx.
            unsafe {
                core::ptr::write_bytes(addr as *mut u8, pattern, header.stride);
            }
        }

        // SAFETY: addr is validated above as a slot-aligned address within
        // pool idx's slab; the caller's contract (not already free, produced
        // by `alloc`) covers the rest.
        unsafe {
            push_head(&mut header.next_free, addr);
        }

        if self.config.track_stats {
            self.stats.total_deallocs += 1;
        }
    }

    /// Maps an address directly to the index of the pool whose slab should
    /// contain it, via `(addr - pools_base) / slab_size` — every pool's slab
    /// is the same `slab_size` bytes wide, so this is a single subtraction
    /// and division rather than a scan over the header table. The caller
    /// still validates the result against the pool's actual bounds and slot
    /// alignment before trusting it.
    fn pool_index_for_address(&self, addr: usize) -> Option<usize> {
        if self.slab_size == 0 {
            return None;
        }
        let offset = addr.checked_sub(self.pools_base)?;
        let idx = offset / self.slab_size;
        (idx < self.pool_count).then_some(idx)
    }

    /// Writes a human-readable dump of the header table and free-list
    /// lengths to `writer`. Not part of the core alloc/free contract — for
    /// inspection and debugging only.
    pub fn dump(&self, writer: &mut dyn fmt::Write) -> fmt::Result {
        if self.state == State::Uninitialised {
            return writeln!(writer, "segpool: uninitialised");
        }

        writeln!(writer, "segpool: {} pools", self.pool_count)?;
        for (idx, header) in self.headers[..self.pool_count].iter().enumerate() {
            let free = self.count_free(header);
            writeln!(
                writer,
                "  pool[{idx}]: block_size={} stride={} slots={} free={}",
                header.block_size, header.stride, header.slot_count, free
            )?;
        }

        if self.config.track_stats {
            writeln!(
                writer,
                "  stats: allocs={} deallocs={}",
                self.stats.total_allocs, self.stats.total_deallocs
            )?;
        }

        Ok(())
    }

    fn count_free(&self, header: &PoolHeader) -> usize {
        let mut count = 0usize;
        let mut cursor = header.next_free;
        while cursor != 0 {
            count += 1;
            // SAFETY: cursor is either 0 or an address threaded by this
            // pool's own free list, which `dump` only reads, never mutates.
            cursor = unsafe { core::ptr::read(cursor as *const usize) };
        }
        count
    }
}

impl Default for SegPoolAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SegPoolAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegPoolAllocator")
            .field("state", &self.state)
            .field("pool_count", &self.pool_count)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "logging")]
fn log_init_failure(err: &InitError) {
    warn!(error = %err, tag = err.tag(), "segpool init rejected");
}

#[cfg(not(feature = "logging"))]
fn log_init_failure(_err: &InitError) {}

#[cfg(feature = "logging")]
fn log_exhaustion(n: usize) {
    trace!(requested = n, "segpool alloc found no pool with free space");
}

#[cfg(not(feature = "logging"))]
fn log_exhaustion(_n: usize) {}
