//! Error types for the layout planner's init path.
//!
//! `alloc`/`free` never return a structured error — per the data model,
//! their only failure signal is a null pointer / silent no-op — but `init`
//! has several genuinely distinct configuration mistakes worth naming for
//! diagnostics, so it gets a real error enum.

/// Why [`crate::SegPoolAllocator::init`] refused a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    /// `init` was already called successfully once.
    #[error("allocator is already initialised")]
    AlreadyInitialised,

    /// `block_sizes` was empty.
    #[error("block_sizes must contain at least one entry")]
    EmptySizes,

    /// `block_sizes.len()` exceeded `n_max`.
    #[error("block_sizes has {count} entries, exceeding the maximum of {n_max}")]
    TooManyPools {
        /// Number of entries supplied.
        count: usize,
        /// Configured maximum pool count.
        n_max: usize,
    },

    /// A requested block size was zero.
    #[error("block size at index {index} is zero")]
    ZeroSizedBlock {
        /// Index into `block_sizes` of the offending entry.
        index: usize,
    },

    /// `block_sizes` was not strictly increasing.
    #[error("block_sizes is not strictly increasing at index {index} ({prev} >= {next})")]
    NotStrictlyIncreasing {
        /// Index of the first offending entry.
        index: usize,
        /// The previous (larger-or-equal) size.
        prev: usize,
        /// The entry that violated strict ordering.
        next: usize,
    },

    /// A block size, once aligned to the word size, would not fit in a pool slab.
    #[error(
        "block size at index {index} ({aligned} bytes aligned) exceeds the per-pool slab size ({slab} bytes)"
    )]
    BlockExceedsSlab {
        /// Index into `block_sizes` of the offending entry.
        index: usize,
        /// The size after alignment to the word size.
        aligned: usize,
        /// The per-pool slab size `P` derived from `H` and `N`.
        slab: usize,
    },
}

impl InitError {
    /// A short machine-stable tag, useful for metrics labels.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::AlreadyInitialised => "already_initialised",
            Self::EmptySizes => "empty_sizes",
            Self::TooManyPools { .. } => "too_many_pools",
            Self::ZeroSizedBlock { .. } => "zero_sized_block",
            Self::NotStrictlyIncreasing { .. } => "not_strictly_increasing",
            Self::BlockExceedsSlab { .. } => "block_exceeds_slab",
        }
    }
}
