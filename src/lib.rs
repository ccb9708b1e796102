//! A tunable segregated-block pool allocator.
//!
//! `segpool` carves a fixed-size, statically reserved heap region into a
//! handful of pools, each serving exactly one block size. Every pool is an
//! intrusive singly-linked free list threaded through the unallocated slots
//! themselves, so `alloc` and `free` are both O(1): no splitting, no
//! coalescing, no per-slot metadata.
//!
//! This buys predictability at the cost of flexibility. The heap region
//! never grows, the pool layout is fixed for the allocator's whole lifetime
//! once [`SegPoolAllocator::init`] succeeds, and there is no free-list
//! coalescing across pools — the tradeoffs a segregated-fit allocator makes
//! on purpose, in exchange for allocation latency a caller can reason about
//! up front. See the [`allocator`] module for the full data model.
//!
//! # Example
//!
//! ```
//! use segpool::SegPoolAllocator;
//!
//! let mut pool = SegPoolAllocator::new();
//! pool.init(&[16, 64, 256]).unwrap();
//!
//! let p = pool.alloc(40);
//! assert!(!p.is_null());
//! pool.free(p);
//! ```
//!
//! # Feature flags
//!
//! - `std` (default): enables the `std::sync::OnceLock`-backed global
//!   singleton in [`global`]. Without it the crate is `no_std` (still
//!   requiring `alloc` for the heap's backing `Box`).
//! - `logging` (default): emits `tracing` events on `init` rejection and
//!   allocation exhaustion.
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

pub mod allocator;
pub mod config;
pub mod error;
pub mod freelist;
pub mod global;
pub mod header;
pub mod resolver;
pub mod utils;

pub use allocator::SegPoolAllocator;
pub use config::{AllocatorConfig, HEAP_SIZE, N_MAX};
pub use error::InitError;
pub use header::PoolHeader;
