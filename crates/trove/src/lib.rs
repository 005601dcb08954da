//! Trove: a contiguous growable sequence whose storage comes from an
//! allocator the caller hands in.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Trove sub-crates. For most users, adding `trove` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use trove::prelude::*;
//!
//! // A fixed 4 KiB region; every growth step is carved out of it.
//! let region = BumpAllocator::new(4096)?;
//! let mut v = AllocVec::with_hint_in(4, &region)?;
//! for x in [10, 20, 30, 40, 50] {
//!     v.push_back(x)?;
//! }
//! assert_eq!(v.capacity(), 6);
//!
//! v.insert_at(0, 5)?;
//! assert_eq!(v.remove_at(3)?, 30);
//! assert_eq!(v.as_slice(), &[5, 10, 20, 40, 50]);
//!
//! let mut cursor = v.begin();
//! cursor.advance()?;
//! assert_eq!(*cursor.current()?, 10);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `trove-core` | Errors, `VecConfig`, capacity planning |
//! | [`alloc`] | `trove-alloc` | `RawAllocator` and the system, bump, and counting allocators |
//! | [`vec`] | `trove-vec` | `AllocVec`, cursors, `UninitSlot` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Errors, configuration, and capacity planning (`trove-core`).
///
/// [`types::VecError`] is the single error type returned by container
/// operations; [`types::growth`] holds the capacity policy.
pub use trove_core as types;

/// The allocator capability and its implementations (`trove-alloc`).
///
/// Implement [`alloc::RawAllocator`] to back containers with your own
/// memory source, or use [`alloc::SystemAllocator`],
/// [`alloc::BumpAllocator`], or [`alloc::CountingAllocator`].
pub use trove_alloc as alloc;

/// The container and its cursors (`trove-vec`).
pub use trove_vec as vec;

/// Common imports for typical Trove usage.
///
/// ```rust
/// use trove::prelude::*;
/// ```
pub mod prelude {
    // Container
    pub use trove_vec::{AllocVec, Cursor, CursorMut, UninitSlot};

    // Allocators
    pub use trove_alloc::{BumpAllocator, CountingAllocator, RawAllocator, SystemAllocator};

    // Configuration and errors
    pub use trove_core::{AllocError, ErrorKind, VecConfig, VecError};
}
