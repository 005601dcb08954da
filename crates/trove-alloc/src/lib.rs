//! Allocator capability for Trove containers.
//!
//! Containers never reach for a global allocator. They are handed a
//! reference to something implementing [`RawAllocator`] and thread every
//! allocation through it, which lets tests inject failures and lets
//! callers pool many containers on one region.
//!
//! # Implementations
//!
//! ```text
//! RawAllocator (capability)
//! ├── SystemAllocator      forwards to std::alloc
//! ├── BumpAllocator        fixed region, cursor bump, LIFO reclaim
//! └── CountingAllocator<A> decorator recording AllocStats
//! ```
//!
//! `unsafe` is denied at the crate root and allowed per module. Every
//! `unsafe` block carries a `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod allocator;
pub mod bump;
pub mod counting;
pub mod system;

pub use allocator::{reallocate_by_copy, RawAllocator};
pub use bump::BumpAllocator;
pub use counting::{AllocStats, CountingAllocator};
pub use system::SystemAllocator;
pub use trove_core::AllocError;
