//! Allocator configuration.
//!
//! Everything here is observable only through the optional debug surface
//! (`SegPoolAllocator::dump`/`stats`) — none of it changes the alloc/free
//! contract described in the data model.

/// Maximum number of pools a [`crate::SegPoolAllocator`] may be configured with.
///
/// Kept at 64 rather than the larger 248 seen in some revisions of this
/// allocator's lineage: it keeps the header table comfortably under a
/// kilobyte and leaves more of the fixed heap region to actual slab space.
pub const N_MAX: usize = 64;

/// Total size, in bytes, of the statically reserved heap region.
pub const HEAP_SIZE: usize = 65_536;

/// Tuning knobs for a [`crate::SegPoolAllocator`].
///
/// None of these fields affect I1–I6; they only control debug instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Byte pattern written into a slot's payload on `alloc`, for debugging.
    pub fill_on_alloc: Option<u8>,

    /// Byte pattern written into a slot's payload on `free`, for debugging.
    pub fill_on_free: Option<u8>,

    /// Whether to maintain the allocation/deallocation counters used by `dump`.
    pub track_stats: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::debug()
        } else {
            Self::production()
        }
    }
}

impl AllocatorConfig {
    /// Debug-friendly configuration: poison patterns and stats on.
    pub const fn debug() -> Self {
        Self {
            fill_on_alloc: Some(0xBB),
            fill_on_free: Some(0xDD),
            track_stats: true,
        }
    }

    /// Production configuration: no instrumentation, minimal overhead.
    pub const fn production() -> Self {
        Self {
            fill_on_alloc: None,
            fill_on_free: None,
            track_stats: false,
        }
    }
}
