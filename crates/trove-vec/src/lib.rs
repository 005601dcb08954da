//! Growable sequence container over a borrowed allocator.
//!
//! [`AllocVec`] is a contiguous, growable sequence that owns its storage
//! but not its allocator: it is handed a `&A` where `A: RawAllocator` and
//! routes every allocation, resize and release through it. Elements are
//! constructed and destroyed explicitly as they enter and leave the
//! logical range.
//!
//! # Architecture
//!
//! ```text
//! AllocVec<'a, T, A>
//! ├── RawBuf<'a, T, A>   capacity + storage, talks to the allocator
//! ├── len                 live prefix of the storage
//! ├── UninitSlot<'v, T>   reserved slot, constructed on write
//! └── Cursor / CursorMut  borrowed position cursors
//! ```
//!
//! # Failure model
//!
//! Every fallible operation returns [`VecError`]. Preconditions are
//! checked before anything is touched, and growth only commits once the
//! allocator has succeeded, so an `Err` always leaves the container as it
//! was.
//!
//! `unsafe` code is confined to `raw`, `vec` and `slot`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod cursor;
mod raw;
pub mod slot;
pub mod vec;

pub use cursor::{Cursor, CursorMut};
pub use slot::UninitSlot;
pub use trove_core::{ErrorKind, VecConfig, VecError};
pub use vec::AllocVec;
